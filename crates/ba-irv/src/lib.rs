//! Instant-runoff voting: the social choice function the audit evaluates
//! against each simulated complete election.

mod social_choice;

pub use social_choice::run_irv;
pub use social_choice::IrvOutcome;
pub use social_choice::RoundTally;
