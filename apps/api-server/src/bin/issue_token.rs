//! Mint a bearer token for local development.
//!
//! ```text
//! issue-token <user-id> <name> [avatar-url]
//! ```
//!
//! Uses the same `JWT_*` environment variables as the server.

use devlink_core::domain::Caller;
use devlink_infra::JwtIdentityProvider;
use uuid::Uuid;

fn main() {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let (Some(id), Some(name)) = (args.next(), args.next()) else {
        eprintln!("usage: issue-token <user-id> <name> [avatar-url]");
        std::process::exit(2);
    };

    let id = match Uuid::parse_str(&id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("invalid user id {id:?}: {e}");
            std::process::exit(2);
        }
    };

    let mut caller = Caller::new(id, name);
    if let Some(avatar) = args.next() {
        caller = caller.with_avatar(avatar);
    }

    match JwtIdentityProvider::from_env().issue_token(&caller) {
        Ok(token) => println!("{token}"),
        Err(e) => {
            eprintln!("failed to issue token: {e}");
            std::process::exit(1);
        }
    }
}
