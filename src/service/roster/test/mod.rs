use std::time::Duration;

use super::*;
use crate::{
    data::memory::MemoryRosterStore,
    service::fake::FakeRoleGateway,
};

mod member;

const BOSS_ROLE: u64 = 10;
const BROKER_ROLE: u64 = 30;

fn catalog() -> PositionCatalog {
    let mut catalog = PositionCatalog::default();
    catalog.get_mut("boss").unwrap().role_id = Some(BOSS_ROLE);
    catalog.get_mut("broker").unwrap().role_id = Some(BROKER_ROLE);
    catalog
}

fn service() -> (RosterService, Arc<MemoryRosterStore>) {
    let store = Arc::new(MemoryRosterStore::new(&catalog()));
    (RosterService::new(store.clone(), catalog()), store)
}

fn service_with_roles() -> (RosterService, Arc<MemoryRosterStore>, Arc<FakeRoleGateway>) {
    let store = Arc::new(MemoryRosterStore::new(&catalog()));
    let gateway = Arc::new(FakeRoleGateway::new());
    let reconciler = Arc::new(RoleReconciler::new(
        gateway.clone(),
        store.clone(),
        catalog(),
        Duration::from_secs(5),
    ));
    let service = RosterService::new(store.clone(), catalog()).with_reconciler(reconciler);
    (service, store, gateway)
}

fn named(name: &str) -> NewMemberParam {
    NewMemberParam {
        name: name.to_string(),
        ..NewMemberParam::default()
    }
}
