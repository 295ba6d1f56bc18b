pub mod datastore;
pub mod token;
pub mod users;

pub use datastore::{Datastore, DynamoDb};
pub use token::{AccessTokenClaims, TokenResponse, TokenService};
pub use users::{InMemoryUserRepository, User, UserRepository};
