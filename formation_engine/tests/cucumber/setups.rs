use cucumber::given;
use formation_engine::db_types::{NewFormationRequest, RequestId};

use crate::cucumber::{formation_world::FormationSystem, FormationWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut FormationWorld) {
    let system = FormationSystem::new().await;
    world.system = Some(system);
}

#[given(expr = "a formation request {word} for company {string}")]
async fn formation_request(world: &mut FormationWorld, id: String, company: String) {
    let id = RequestId::new(id);
    let request = NewFormationRequest::new(id.clone(), "customer_1", &company);
    world.system().requests.create_request(request).await.expect("Error creating request");
    world.system_mut().request_id = Some(id);
}
