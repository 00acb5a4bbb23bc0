//! User API Demo
//!
//! Demonstrates courier's metadata-driven service pattern.

// Demo-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(dead_code)]

use std::sync::LazyLock;

use courier::prelude::*;

// ============================================================================
// Data Types
// ============================================================================

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub age: u8,
}

/// Payload to create a user.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub age: u8,
}

/// Filters for listing users. Unset filters are dropped from the query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserFilter {
    pub name: Option<String>,
    pub page: Option<u32>,
    pub active: bool,
}

/// Login form.
#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Session returned by a login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub token: String,
}

// ============================================================================
// Service metadata
// ============================================================================

static USER_SERVICE: LazyLock<ServiceMetadata> = LazyLock::new(|| {
    ServiceMetadata::builder("/api/v1")
        .method(
            "get_user",
            MethodMetadata::get("/users/{id}")
                .header_param(0, "X-Token")
                .path_param(1, "id"),
        )
        .method(
            "list_users",
            MethodMetadata::get("/users")
                .header("Accept", "application/json")
                .header_param(0, "X-Token")
                .query_map(1),
        )
        .method(
            "create_user",
            MethodMetadata::post("/users")
                .header_param(0, "X-Token")
                .body(1),
        )
        .method(
            "delete_user",
            MethodMetadata::delete("/users/{id}")
                .header_param(0, "X-Token")
                .path_param(1, "id"),
        )
        .method(
            "login",
            MethodMetadata::post("/auth/login")
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(0),
        )
        .build()
});

// ============================================================================
// Service
// ============================================================================

/// User API client.
pub struct UserService<C = HyperClient> {
    proxy: ServiceProxy<C>,
}

impl<C> Service<C> for UserService<C> {
    const NAME: &'static str = "UserService";

    fn metadata() -> &'static ServiceMetadata {
        &USER_SERVICE
    }

    fn from_proxy(proxy: ServiceProxy<C>) -> Self {
        Self { proxy }
    }
}

impl<C: HttpTransport> UserService<C> {
    /// Fetch one user.
    pub async fn get_user(&self, token: &str, id: u64) -> Result<User> {
        self.proxy
            .interceptor("get_user")?
            .call_json(&args![token, id]?)
            .await
    }

    /// List users matching `filter`.
    pub async fn list_users(&self, token: &str, filter: &UserFilter) -> Result<Vec<User>> {
        self.proxy
            .interceptor("list_users")?
            .call_json(&args![token, filter]?)
            .await
    }

    /// Create a user.
    pub async fn create_user(&self, token: &str, user: &NewUser) -> Result<User> {
        self.proxy
            .interceptor("create_user")?
            .call_json(&args![token, user]?)
            .await
    }

    /// Delete a user.
    pub async fn delete_user(&self, token: &str, id: u64) -> Result<()> {
        self.proxy
            .interceptor("delete_user")?
            .call(&args![token, id]?)?
            .await
            .map(drop)
    }

    /// Log in with a form-encoded body.
    pub async fn login(&self, form: &LoginForm) -> Result<Session> {
        self.proxy
            .interceptor("login")?
            .call_json(&args![form]?)
            .await
    }

    /// The endpoint this service talks to.
    pub fn endpoint(&self) -> &str {
        self.proxy.endpoint()
    }
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let users: UserService = ServiceBuilder::new()
        .endpoint("https://users.example.com")
        .build();

    println!("User service created!");
    println!("Endpoint: {}", users.endpoint());

    // One transport with middleware, shared by every service built from it
    let transport = HyperClient::builder()
        .default_header("User-Agent", "courier-user-api-demo/0.1.0")
        .with_logging()
        .build();
    let builder = ServiceBuilder::with_transport(transport).endpoint("https://users.example.com");
    let _users: UserService = builder.build();

    println!("\nUser service with a shared transport created!");

    // Requests can be resolved without sending them
    let request = users
        .proxy
        .interceptor("get_user")?
        .prepare(&args!["my-token", 42]?)?;
    println!("\n=== Resolved request ===");
    println!("{} {}", request.verb(), request.url());
    for (name, value) in request.headers() {
        println!("{name}: {value}");
    }

    println!("\n=== Example API calls (would require a real server) ===");
    println!("users.get_user(\"my-token\", 42).await?");
    println!("users.list_users(\"my-token\", &UserFilter::default()).await?");
    println!("users.login(&LoginForm {{ .. }}).await?");

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================
