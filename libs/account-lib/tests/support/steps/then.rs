use cucumber::then;

use account_lib::AccessDecision;

use crate::support::world::{parse_authorities, TestWorld};

#[then(expr = "the user should have authority {string}")]
pub async fn has_authority(world: &mut TestWorld, authority: String) {
    assert!(world.service().has_authority(&authority));
}

#[then(expr = "the user should not have authority {string}")]
pub async fn lacks_authority(world: &mut TestWorld, authority: String) {
    assert!(!world.service().has_authority(&authority));
}

#[then(expr = "the user should have any of the authorities {string}")]
pub async fn has_any_authority(world: &mut TestWorld, authorities: String) {
    assert!(world.service().has_any_authority(parse_authorities(&authorities)));
}

#[then(expr = "the user should not have any of the authorities {string}")]
pub async fn lacks_all_authorities(world: &mut TestWorld, authorities: String) {
    assert!(!world.service().has_any_authority(parse_authorities(&authorities)));
}

#[then(expr = "the account server should have received {int} request(s)")]
pub async fn server_requests(world: &mut TestWorld, count: usize) {
    assert_eq!(world.provider().calls(), count);
}

#[then("the identity should be empty")]
pub async fn identity_empty(world: &mut TestWorld) {
    let last = world.identities.last().expect("identity should have been requested");
    assert!(last.is_none());
}

#[then(expr = "the identity display name should be {string}")]
pub async fn identity_display_name(world: &mut TestWorld, name: String) {
    let last = world.identities.last().expect("identity should have been requested");
    let principal = last.as_ref().expect("an account should be signed in");
    assert_eq!(principal.display_name(), name);
}

#[then("both lookups should return the same account")]
pub async fn same_account(world: &mut TestWorld) {
    assert_eq!(world.identities.len(), 2);
    assert!(world.identities[0].is_some());
    assert_eq!(world.identities[0], world.identities[1]);
}

#[then(expr = "access should be {string}")]
pub async fn access_should_be(world: &mut TestWorld, expected: String) {
    let expected = match expected.as_str() {
        "granted" => AccessDecision::Granted,
        "forbidden" => AccessDecision::Forbidden,
        "login required" => AccessDecision::LoginRequired,
        other => panic!("unknown access decision '{other}'"),
    };
    assert_eq!(world.decision, Some(expected));
}
