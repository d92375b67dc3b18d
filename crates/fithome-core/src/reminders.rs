//! Reminder planning and contextual advisories.
//!
//! Nothing here schedules anything. [`reminder_plan`] describes the daily
//! repeating reminders the platform scheduler should register, and
//! [`advisories`] computes the one-shot nudges worth sending right now. Both
//! are handed to a [`Notifier`] owned by the outer layer.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::profile::{TimeOfDay, UserProfile};
use crate::progress::DailyProgress;

/// Thresholds for the contextual advisories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    #[serde(default = "default_calorie_window_start")]
    pub calorie_window_start_hour: u32,
    #[serde(default = "default_calorie_window_end")]
    pub calorie_window_end_hour: u32,
    #[serde(default = "default_calorie_threshold")]
    pub calorie_remaining_threshold: u32,
    #[serde(default = "default_streak_risk_start")]
    pub streak_risk_start_hour: u32,
    #[serde(default = "default_streak_risk_max_hours")]
    pub streak_risk_max_hours: i64,
}

fn default_calorie_window_start() -> u32 {
    17
}
fn default_calorie_window_end() -> u32 {
    22
}
fn default_calorie_threshold() -> u32 {
    500
}
fn default_streak_risk_start() -> u32 {
    20
}
fn default_streak_risk_max_hours() -> i64 {
    4
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            calorie_window_start_hour: default_calorie_window_start(),
            calorie_window_end_hour: default_calorie_window_end(),
            calorie_remaining_threshold: default_calorie_threshold(),
            streak_risk_start_hour: default_streak_risk_start(),
            streak_risk_max_hours: default_streak_risk_max_hours(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Posture,
    Meal,
    Workout,
}

/// A daily repeating reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderSlot {
    pub id: String,
    pub kind: ReminderKind,
    pub title: String,
    pub body: String,
    pub time: TimeOfDay,
    pub repeats: bool,
}

impl ReminderSlot {
    fn daily(id: &str, kind: ReminderKind, title: &str, body: &str, time: TimeOfDay) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            body: body.into(),
            time,
            repeats: true,
        }
    }
}

const LOSS_FRAMED_LUNCH: &str =
    "Não perca o progresso de hoje! Seus músculos precisam desse superávit agora.";
const GAIN_FRAMED_LUNCH: &str =
    "Sinta-se mais forte hoje. Hora do seu Burger Blend para bater a meta!";

fn at(hour: u32, minute: u32) -> TimeOfDay {
    TimeOfDay::new(hour, minute).unwrap_or_default()
}

/// Daily reminders for `profile`, with lunch wording picked by `weekday`.
///
/// The shutdown-ritual workout reminder is always present; posture and meal
/// reminders follow the profile toggles.
pub fn reminder_plan(profile: &UserProfile, weekday: Weekday) -> Vec<ReminderSlot> {
    let mut plan = Vec::new();

    if profile.posture_reminders {
        plan.push(ReminderSlot::daily(
            "posture-morning",
            ReminderKind::Posture,
            "Correção de Postura",
            "Ombros longe das orelhas! Respire fundo e alongue.",
            at(10, 30),
        ));
        plan.push(ReminderSlot::daily(
            "posture-afternoon",
            ReminderKind::Posture,
            "Lembrete de Postura",
            "Costas retas, pés no chão. Seu corpo agradece!",
            at(15, 0),
        ));
    }

    if profile.meal_reminders {
        let lunch = if weekday.num_days_from_sunday() % 2 == 0 {
            LOSS_FRAMED_LUNCH
        } else {
            GAIN_FRAMED_LUNCH
        };
        plan.push(ReminderSlot::daily(
            "meal-midmorning",
            ReminderKind::Meal,
            "Shot de Mel",
            "Hora do boost de energia para o home office!",
            at(10, 0),
        ));
        plan.push(ReminderSlot::daily(
            "meal-lunch",
            ReminderKind::Meal,
            "Hora do Almoço",
            lunch,
            at(12, 30),
        ));
        plan.push(ReminderSlot::daily(
            "meal-afternoon",
            ReminderKind::Meal,
            "Lanche da Tarde",
            "Iogurte + Granola para manter a energia!",
            at(16, 0),
        ));
    }

    plan.push(ReminderSlot::daily(
        "workout-reminder",
        ReminderKind::Workout,
        "Shutdown Ritual",
        "Hora de fechar o laptop e fazer os 10 minutos de treino!",
        profile.shutdown_time,
    ));

    plan
}

/// A one-shot nudge computed from today's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Advisory {
    CalorieGoalApproaching { remaining: u32 },
    StreakAtRisk { hours_until_midnight: i64 },
    /// Sent once, when the day's workout is first completed.
    WorkoutReward,
}

impl Advisory {
    pub fn title(&self) -> &'static str {
        match self {
            Advisory::CalorieGoalApproaching { .. } => "Meta Calórica",
            Advisory::StreakAtRisk { .. } => "Seu Streak está em Risco!",
            Advisory::WorkoutReward => "Treino Completo!",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Advisory::CalorieGoalApproaching { remaining } => {
                format!("Faltam {remaining} kcal para atingir sua meta de hoje!")
            }
            Advisory::StreakAtRisk {
                hours_until_midnight,
            } => format!(
                "Faltam {hours_until_midnight}h para meia-noite. Complete seu treino hoje!"
            ),
            Advisory::WorkoutReward => {
                "Recompensa Liberada: Shot de Mel ou Shake de Whey".to_string()
            }
        }
    }
}

/// Whole hours left until local midnight, rounded up.
pub fn hours_until_midnight(now: NaiveDateTime) -> i64 {
    let midnight = (now.date() + Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .unwrap_or(now);
    let secs = (midnight - now).num_seconds();
    (secs + 3599) / 3600
}

/// Advisories worth sending at local time `now`.
pub fn advisories(
    progress: &DailyProgress,
    profile: &UserProfile,
    now: NaiveDateTime,
    config: &AdvisoryConfig,
) -> Vec<Advisory> {
    let mut out = Vec::new();
    let hour = now.hour();

    if hour >= config.calorie_window_start_hour && hour < config.calorie_window_end_hour {
        let remaining = progress.calories_remaining(profile.calorie_goal);
        if remaining > 0 && remaining <= config.calorie_remaining_threshold {
            out.push(Advisory::CalorieGoalApproaching { remaining });
        }
    }

    if hour >= config.streak_risk_start_hour && !progress.workout_completed {
        let hours = hours_until_midnight(now);
        if hours > 0 && hours <= config.streak_risk_max_hours {
            out.push(Advisory::StreakAtRisk {
                hours_until_midnight: hours,
            });
        }
    }

    out
}

/// The platform notification scheduler, as seen from the core.
pub trait Notifier: Send + Sync {
    /// Register the daily repeating reminders, replacing any earlier plan.
    fn schedule_daily(&self, _plan: &[ReminderSlot]) -> Result<()> {
        Ok(()) // default no-op
    }

    /// Fire a one-shot advisory. Fire-and-forget from the core's side.
    fn schedule_advisory(&self, advisory: &Advisory) -> Result<()>;
}

/// Convenience for weekday-of-`now`.
pub fn reminder_plan_for(profile: &UserProfile, now: NaiveDateTime) -> Vec<ReminderSlot> {
    reminder_plan(profile, now.weekday())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::DayKey;
    use chrono::NaiveDate;

    fn local(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn progress(calories: u32, workout: bool) -> DailyProgress {
        let mut p = DailyProgress::empty("2024-01-01".parse::<DayKey>().unwrap());
        p.apply_nutrition(calories, 0.0);
        if workout {
            p.mark_workout_complete();
        }
        p
    }

    #[test]
    fn full_plan_with_both_toggles() {
        let plan = reminder_plan(&UserProfile::default(), Weekday::Mon);
        let ids: Vec<_> = plan.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "posture-morning",
                "posture-afternoon",
                "meal-midmorning",
                "meal-lunch",
                "meal-afternoon",
                "workout-reminder",
            ]
        );
        assert_eq!(plan.last().unwrap().time.to_string(), "18:00");
        assert!(plan.iter().all(|s| s.repeats));
    }

    #[test]
    fn toggles_off_leave_only_workout() {
        let profile = UserProfile {
            meal_reminders: false,
            posture_reminders: false,
            shutdown_time: "19:15".parse().unwrap(),
            ..Default::default()
        };
        let plan = reminder_plan(&profile, Weekday::Tue);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].kind, ReminderKind::Workout);
        assert_eq!(plan[0].time.to_string(), "19:15");
    }

    #[test]
    fn lunch_wording_alternates() {
        let lunch = |day| {
            reminder_plan(&UserProfile::default(), day)
                .into_iter()
                .find(|s| s.id == "meal-lunch")
                .unwrap()
                .body
        };
        assert_eq!(lunch(Weekday::Sun), LOSS_FRAMED_LUNCH);
        assert_eq!(lunch(Weekday::Mon), GAIN_FRAMED_LUNCH);
        assert_eq!(lunch(Weekday::Tue), LOSS_FRAMED_LUNCH);
    }

    #[test]
    fn calorie_advisory_inside_window_only() {
        let profile = UserProfile::default();
        let cfg = AdvisoryConfig::default();
        let p = progress(2100, true);

        assert_eq!(
            advisories(&p, &profile, local(18, 0), &cfg),
            vec![Advisory::CalorieGoalApproaching { remaining: 400 }]
        );
        assert!(advisories(&p, &profile, local(16, 59), &cfg).is_empty());
        assert!(advisories(&p, &profile, local(22, 0), &cfg).is_empty());
    }

    #[test]
    fn calorie_advisory_skipped_when_far_or_met() {
        let profile = UserProfile::default();
        let cfg = AdvisoryConfig::default();
        assert!(advisories(&progress(1000, true), &profile, local(18, 0), &cfg).is_empty());
        assert!(advisories(&progress(2600, true), &profile, local(18, 0), &cfg).is_empty());
    }

    #[test]
    fn streak_risk_after_eight_pm_without_workout() {
        let profile = UserProfile::default();
        let cfg = AdvisoryConfig::default();
        let p = progress(2500, false);

        assert_eq!(
            advisories(&p, &profile, local(20, 30), &cfg),
            vec![Advisory::StreakAtRisk {
                hours_until_midnight: 4
            }]
        );
        assert_eq!(
            advisories(&p, &profile, local(23, 59), &cfg),
            vec![Advisory::StreakAtRisk {
                hours_until_midnight: 1
            }]
        );
        assert!(advisories(&p, &profile, local(19, 59), &cfg).is_empty());
        assert!(advisories(&progress(2500, true), &profile, local(21, 0), &cfg).is_empty());
    }

    #[test]
    fn exactly_eight_pm_is_four_hours() {
        assert_eq!(hours_until_midnight(local(20, 0)), 4);
        assert_eq!(hours_until_midnight(local(0, 0)), 24);
    }

    #[test]
    fn advisory_text() {
        let a = Advisory::CalorieGoalApproaching { remaining: 120 };
        assert_eq!(a.body(), "Faltam 120 kcal para atingir sua meta de hoje!");
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#"{"type":"calorie_goal_approaching","remaining":120}"#);

        let reward = Advisory::WorkoutReward;
        assert_eq!(reward.title(), "Treino Completo!");
        assert!(reward.body().contains("Shake de Whey"));
        assert_eq!(
            serde_json::to_string(&reward).unwrap(),
            r#"{"type":"workout_reward"}"#
        );
    }
}
