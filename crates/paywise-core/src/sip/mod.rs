pub mod projection;

pub use projection::{project_growth, rollup_yearly, SipInput, SipProjectionRow, SipYearlyRow};
