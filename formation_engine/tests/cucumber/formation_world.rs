use cucumber::World;
use formation_engine::{
    db_types::RequestId,
    events::EventProducers,
    test_utils::prepare_env::new_test_database,
    ReconciliationApi,
    ReconciliationResult,
    RequestApi,
    SqliteDatabase,
    StatusFlowApi,
};

use crate::support::order_feed::StaticOrderFeed;

#[derive(Default, Debug, World)]
pub struct FormationWorld {
    pub system: Option<FormationSystem>,
}

#[derive(Debug)]
pub struct FormationSystem {
    pub db: SqliteDatabase,
    pub feed: StaticOrderFeed,
    pub requests: RequestApi<SqliteDatabase>,
    pub status: StatusFlowApi<SqliteDatabase>,
    pub reconciliation: ReconciliationApi<SqliteDatabase, StaticOrderFeed>,
    pub request_id: Option<RequestId>,
    pub last_result: Option<ReconciliationResult>,
}

impl FormationWorld {
    pub fn system(&self) -> &FormationSystem {
        self.system.as_ref().expect("System not initialised")
    }

    pub fn system_mut(&mut self) -> &mut FormationSystem {
        self.system.as_mut().expect("System not initialised")
    }

    pub fn request_id(&self) -> RequestId {
        self.system().request_id.clone().expect("No formation request has been created")
    }
}

impl FormationSystem {
    pub async fn new() -> Self {
        let db = new_test_database().await;
        let feed = StaticOrderFeed::default();
        Self {
            requests: RequestApi::new(db.clone()),
            status: StatusFlowApi::new(db.clone(), EventProducers::default()),
            reconciliation: ReconciliationApi::new(db.clone(), feed.clone(), EventProducers::default()),
            db,
            feed,
            request_id: None,
            last_result: None,
        }
    }
}
