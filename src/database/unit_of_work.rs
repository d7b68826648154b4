//! Unit of work: one connection (optionally a transaction) shared by every
//! repository used within a single service operation.
//!
//! A transactional unit of work that is dropped without `commit()` rolls
//! back, so an early `?` return never leaves a half-written operation behind.

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::repository::*;

#[async_trait]
pub trait UnitOfWork: Send {
    fn users(&mut self) -> &mut dyn UserRepository;
    fn teachers(&mut self) -> &mut dyn TeacherRepository;
    fn students(&mut self) -> &mut dyn StudentRepository;
    fn groups(&mut self) -> &mut dyn GroupRepository;
    fn disciplines(&mut self) -> &mut dyn DisciplineRepository;
    fn grades(&mut self) -> &mut dyn GradeRepository;
    fn group_disciplines(&mut self) -> &mut dyn GroupDisciplineRepository;

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError>;
    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError>;
}

/// Backing store that hands out units of work.
#[async_trait]
pub trait Store: Send + Sync {
    /// Open a transactional unit of work.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DatabaseError>;

    /// Open a unit of work for read paths. Writes made through it are not
    /// guaranteed to persist; use `begin` for anything that mutates.
    async fn read(&self) -> Result<Box<dyn UnitOfWork>, DatabaseError>;

    /// Apply schema migrations.
    async fn migrate(&self) -> Result<(), DatabaseError>;

    /// Cheap liveness check used by `/health`.
    async fn ping(&self) -> Result<(), DatabaseError>;

    fn backend(&self) -> &'static str;
}
