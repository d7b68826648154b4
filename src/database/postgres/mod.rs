//! PostgreSQL store. Each repository contract is implemented directly on
//! [`PgUnitOfWork`], so all repositories of one unit of work share its
//! connection or transaction.

mod disciplines;
mod grades;
mod group_disciplines;
mod groups;
mod students;
mod teachers;
mod users;

use std::ops::{Deref, DerefMut};

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::database::manager::DatabaseError;
use crate::database::repository::*;
use crate::database::unit_of_work::{Store, UnitOfWork};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DatabaseError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { conn: PgConn::Tx(tx) }))
    }

    async fn read(&self) -> Result<Box<dyn UnitOfWork>, DatabaseError> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgUnitOfWork { conn: PgConn::Pooled(conn) }))
    }

    async fn migrate(&self) -> Result<(), DatabaseError> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

enum PgConn {
    Tx(Transaction<'static, Postgres>),
    Pooled(PoolConnection<Postgres>),
}

impl Deref for PgConn {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        match self {
            PgConn::Tx(tx) => tx,
            PgConn::Pooled(conn) => conn,
        }
    }
}

impl DerefMut for PgConn {
    fn deref_mut(&mut self) -> &mut PgConnection {
        match self {
            PgConn::Tx(tx) => tx,
            PgConn::Pooled(conn) => conn,
        }
    }
}

pub struct PgUnitOfWork {
    conn: PgConn,
}

impl PgUnitOfWork {
    fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    fn users(&mut self) -> &mut dyn UserRepository {
        self
    }

    fn teachers(&mut self) -> &mut dyn TeacherRepository {
        self
    }

    fn students(&mut self) -> &mut dyn StudentRepository {
        self
    }

    fn groups(&mut self) -> &mut dyn GroupRepository {
        self
    }

    fn disciplines(&mut self) -> &mut dyn DisciplineRepository {
        self
    }

    fn grades(&mut self) -> &mut dyn GradeRepository {
        self
    }

    fn group_disciplines(&mut self) -> &mut dyn GroupDisciplineRepository {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        if let PgConn::Tx(tx) = self.conn {
            tx.commit().await?;
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError> {
        if let PgConn::Tx(tx) = self.conn {
            tx.rollback().await?;
        }
        Ok(())
    }
}
