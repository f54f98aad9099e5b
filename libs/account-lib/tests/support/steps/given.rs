use cucumber::given;

use account_lib::Principal;

use crate::support::world::{parse_authorities, TestWorld};

#[given("a fresh account service")]
pub async fn fresh_service(world: &mut TestWorld) {
    *world = TestWorld::default();
}

#[given("no user is signed in on the server")]
pub async fn no_user_on_server(world: &mut TestWorld) {
    world.provider().set_account(None);
}

#[given(expr = "the server knows the account {string} with authorities {string}")]
pub async fn server_knows_account(world: &mut TestWorld, login: String, authorities: String) {
    world.provider().set_account(Some(Principal {
        login: Some(login),
        activated: true,
        authorities: parse_authorities(&authorities),
        ..Principal::default()
    }));
}

#[given("the server answers slowly")]
pub async fn server_is_slow(world: &mut TestWorld) {
    world.provider().set_slow();
}

#[given("the account server is unreachable")]
pub async fn server_unreachable(world: &mut TestWorld) {
    world.provider().set_unreachable();
}
