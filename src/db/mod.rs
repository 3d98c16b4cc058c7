pub mod store;
pub use store::ScheduleStore;
pub mod schedule_repo;
pub use schedule_repo::PgScheduleStore;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod business_repo;
pub use business_repo::BusinessRepository;

#[cfg(test)]
pub mod memory;
