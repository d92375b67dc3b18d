//! Built-in quick-add foods and the nightly bodyweight routine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodItem {
    pub id: &'static str,
    pub name: &'static str,
    pub calories: u32,
    pub protein: f64,
}

pub const FOOD_ITEMS: &[FoodItem] = &[
    FoodItem {
        id: "pao-nutella",
        name: "Pão + Nutella",
        calories: 350,
        protein: 6.0,
    },
    FoodItem {
        id: "iogurte-granola",
        name: "Iogurte + Granola",
        calories: 280,
        protein: 12.0,
    },
    FoodItem {
        id: "shake-whey",
        name: "Shake Whey",
        calories: 200,
        protein: 25.0,
    },
    FoodItem {
        id: "burger-blend",
        name: "Burger Blend",
        calories: 550,
        protein: 35.0,
    },
];

/// Mid-morning energy shot, offered separately from the main grid.
pub const ENERGY_BOOST: FoodItem = FoodItem {
    id: "shot-mel",
    name: "Shot de Mel",
    calories: 64,
    protein: 0.0,
};

/// Look up a catalog food (including the energy boost) by id.
pub fn food_item(id: &str) -> Option<&'static FoodItem> {
    FOOD_ITEMS
        .iter()
        .chain(std::iter::once(&ENERGY_BOOST))
        .find(|f| f.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Held for a fixed number of seconds
    Timer,
    /// Counted rep by rep, outside the timed routine
    Counter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exercise {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Seconds; zero for counters
    pub duration: u32,
    pub kind: ExerciseKind,
}

pub const EXERCISES: &[Exercise] = &[
    Exercise {
        id: "barra-fixa",
        name: "Barra Fixa",
        description: "Toque para contar cada repetição",
        duration: 0,
        kind: ExerciseKind::Counter,
    },
    Exercise {
        id: "prancha",
        name: "Prancha Abdominal",
        description: "Mantenha o corpo reto como uma tábua",
        duration: 60,
        kind: ExerciseKind::Timer,
    },
    Exercise {
        id: "agachamento",
        name: "Agachamento na Parede",
        description: "Costas na parede, joelhos a 90°",
        duration: 45,
        kind: ExerciseKind::Timer,
    },
    Exercise {
        id: "panturrilha",
        name: "Elevação de Panturrilha",
        description: "Suba na ponta dos pés e desça devagar",
        duration: 60,
        kind: ExerciseKind::Timer,
    },
];

/// A workout routine. Only timer exercises count toward completion.
#[derive(Debug, Clone, Copy)]
pub struct Routine {
    exercises: &'static [Exercise],
}

impl Default for Routine {
    fn default() -> Self {
        Self {
            exercises: EXERCISES,
        }
    }
}

impl Routine {
    pub fn exercises(&self) -> &'static [Exercise] {
        self.exercises
    }

    pub fn timer_exercises(&self) -> impl Iterator<Item = &'static Exercise> {
        self.exercises
            .iter()
            .filter(|e| e.kind == ExerciseKind::Timer)
    }

    /// Sum of all timer durations, in seconds.
    pub fn total_duration(&self) -> u32 {
        self.timer_exercises().map(|e| e.duration).sum()
    }

    /// True once every timer exercise appears in `completed`.
    pub fn is_complete<S: AsRef<str>>(&self, completed: &[S]) -> bool {
        self.timer_exercises()
            .all(|e| completed.iter().any(|c| c.as_ref() == e.id))
    }

    /// Timer exercises not yet in `completed`.
    pub fn remaining<S: AsRef<str>>(&self, completed: &[S]) -> Vec<&'static str> {
        self.timer_exercises()
            .filter(|e| !completed.iter().any(|c| c.as_ref() == e.id))
            .map(|e| e.id)
            .collect()
    }
}
