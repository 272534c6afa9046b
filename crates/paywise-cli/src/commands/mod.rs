pub mod emi;
pub mod sip;
