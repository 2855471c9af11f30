pub mod args;
pub mod badge;
pub mod commands;
pub mod domain;
pub mod impact;
pub mod preferences;
pub mod records;
pub mod showcase;
pub mod sqlite;
pub mod stats;
pub mod tutorial;
pub mod utils;
pub mod verification;

pub use args::{Args, Command};
pub use badge::BadgeEmbed;
pub use domain::normalize_host;
pub use impact::{compute_impact, CalculatorInput, Device, ImpactResult, ScreenType};
pub use records::SiteRecord;
pub use showcase::ThemeMode;
pub use sqlite::SiteStore;
pub use stats::{compute_adoption_percentage, Dashboard};
pub use verification::{
    ReviewQueue, VerificationError, VerificationErrorKind, VerificationState, Verifier,
};
