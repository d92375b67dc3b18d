use chrono::{DateTime, Utc};
use clap::Subcommand;
use fithome_core::catalog::food_item;
use fithome_core::{ENERGY_BOOST, FOOD_ITEMS};

use super::{instant, print_json, tracker, CmdResult};

#[derive(Subcommand)]
pub enum FoodAction {
    /// Log a catalog food by id (e.g. "shake-whey")
    Log {
        /// Food item id
        item: String,
        /// When it was eaten (RFC 3339, defaults to now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Log a food that is not in the catalog
    Custom {
        /// Identifier to record with the entry
        #[arg(long, default_value = "custom")]
        id: String,
        #[arg(long)]
        calories: u32,
        /// Grams of protein
        #[arg(long, default_value_t = 0.0)]
        protein: f64,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// List every food log entry
    List,
    /// Show the built-in catalog
    Catalog,
}

pub fn run(action: FoodAction) -> CmdResult {
    match action {
        FoodAction::Log { item, at } => {
            let food = food_item(&item).ok_or_else(|| format!("unknown food item: {item}"))?;
            let logged = tracker()?.log_food_item(food, instant(at))?;
            print_json(&logged)
        }
        FoodAction::Custom {
            id,
            calories,
            protein,
            at,
        } => {
            let logged = tracker()?.log_food(&id, calories, protein, instant(at))?;
            print_json(&logged)
        }
        FoodAction::List => print_json(&tracker()?.food_logs()?),
        FoodAction::Catalog => {
            let all: Vec<_> = FOOD_ITEMS.iter().chain(std::iter::once(&ENERGY_BOOST)).collect();
            print_json(&all)
        }
    }
}
