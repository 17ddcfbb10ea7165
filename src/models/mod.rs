pub mod application;
pub mod user;

pub use application::{ApplicationStatus, ApplicationWithApplicant, LoanApplication};
pub use user::{Admin, User};
