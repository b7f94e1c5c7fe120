pub mod ashtakavarga;
pub mod bala;
pub mod dashas;
pub mod graha;
pub mod nakshatra;
pub mod panchanga;
pub mod state;
pub mod types;
pub mod vargas;
pub mod yogas;

pub use ashtakavarga::{compute_ashtakavarga, Ashtakavarga, BhinnaGrid, SarvaGrid};
pub use bala::{compute_graha_bala, compute_rashi_bala, GrahaBala, RashiBala};
pub use dashas::{compute_vimshottari, DashaLevel, PeriodNode, Vimshottari};
pub use graha::{Graha, LAGNA_KEY};
pub use nakshatra::{nakshatra_for_longitude, NakshatraPlacement};
pub use panchanga::{compute_panchanga, Panchanga};
pub use state::{analyze_basic, analyze_extended, GrahaState};
pub use types::{ChartData, GrahaPosition};
pub use vargas::{build_varga, Placement, VargaChart, VargaCode};
pub use yogas::{detect_yogas, YogaMatch, YogaType};
