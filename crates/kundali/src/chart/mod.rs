pub mod assembler;
pub mod request;
pub mod response;
pub mod settings;

pub use assembler::{assemble, assemble_at};
pub use request::{ChartRequest, InfoLevel};
pub use response::{ChartResponse, GrahaEntry, LagnaEntry};
pub use settings::{ChartSettings, NowSettings};
