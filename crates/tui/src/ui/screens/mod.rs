pub mod challenges;
pub mod dashboard;
pub mod login;
pub mod profile;
pub mod transactions;
pub mod users;
