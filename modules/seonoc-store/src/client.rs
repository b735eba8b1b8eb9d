use anyhow::Result;
use mongodb::{Client, Database};

use crate::{
    AuditRepo, BrandRepo, ChangeLogRepo, ComplaintRepo, ConflictRepo, DomainRepo, EntryRepo,
    NetworkRepo, OptimizationRepo, SchedulerStateRepo, SettingsRepo, TemplateRepo, TestAlertRepo,
};

/// Thin wrapper around the MongoDB database handle providing connection
/// setup and typed repository accessors. One collection per entity family.
#[derive(Clone)]
pub struct StoreClient {
    db: Database,
}

impl StoreClient {
    /// Connect to MongoDB with the given connection string.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(db_name);
        Ok(Self { db })
    }

    /// Get a reference to the underlying database.
    pub fn inner(&self) -> &Database {
        &self.db
    }

    pub fn brands(&self) -> BrandRepo {
        BrandRepo::new(&self.db)
    }

    pub fn domains(&self) -> DomainRepo {
        DomainRepo::new(&self.db)
    }

    pub fn networks(&self) -> NetworkRepo {
        NetworkRepo::new(&self.db)
    }

    pub fn entries(&self) -> EntryRepo {
        EntryRepo::new(&self.db)
    }

    pub fn change_logs(&self) -> ChangeLogRepo {
        ChangeLogRepo::new(&self.db)
    }

    pub fn conflicts(&self) -> ConflictRepo {
        ConflictRepo::new(&self.db)
    }

    pub fn optimizations(&self) -> OptimizationRepo {
        OptimizationRepo::new(&self.db)
    }

    pub fn complaints(&self) -> ComplaintRepo {
        ComplaintRepo::new(&self.db)
    }

    pub fn templates(&self) -> TemplateRepo {
        TemplateRepo::new(&self.db)
    }

    pub fn settings(&self) -> SettingsRepo {
        SettingsRepo::new(&self.db)
    }

    pub fn audit(&self) -> AuditRepo {
        AuditRepo::new(&self.db)
    }

    pub fn test_alerts(&self) -> TestAlertRepo {
        TestAlertRepo::new(&self.db)
    }

    pub fn scheduler_state(&self) -> SchedulerStateRepo {
        SchedulerStateRepo::new(&self.db)
    }
}
