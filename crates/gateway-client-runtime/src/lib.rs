//! gRPC-gateway Client Runtime
//!
//! Calls RPC methods through a gRPC-gateway HTTP/JSON endpoint using the
//! binding plans computed by `gateway-binding-planner`. Unary calls return
//! the decoded response; server streaming calls deliver newline-delimited
//! frames on a channel. Gateway error objects become gRPC status errors and
//! network failures stay transport errors.
//!
//! # Example
//!
//! ```rust,no_run
//! use gateway_client_runtime::prelude::*;
//! use gateway_binding_planner::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut builder = Schema::builder();
//!     let request = builder.message(MessageType::new("UnaryRequest", "service.proto").with_package("main"));
//!     builder.field(request, FieldDefinition::scalar("counter", ScalarKind::Number));
//!     builder.service(
//!         ServiceDefinition::new("CounterService")
//!             .with_package("main")
//!             .with_method(MethodDefinition::new("Increment", request, request)),
//!     );
//!     let schema = builder.build()?;
//!     let report = GenerationBuilder::new()
//!         .schema(&schema)
//!         .emitter(DefaultEmitter)
//!         .execute()?;
//!
//!     let client = Client::new(Reqwest::new("http://localhost:8081")?);
//!     let response: serde_json::Value = client
//!         .unary(&report.output[0], &json!({"counter": 199}))
//!         .await?;
//!     println!("{}", response);
//!
//!     Ok(())
//! }
//! ```

mod adapters;
pub mod entities;
pub mod error;
pub mod use_cases;

pub use error::CallError;

#[cfg(feature = "reqwest")]
pub use adapters::gateways::Reqwest;

/// Client over the default reqwest transport
#[cfg(feature = "reqwest")]
pub type DefaultClient = use_cases::Client<Reqwest>;

#[cfg(feature = "reqwest")]
impl DefaultClient {
    /// Client sending requests below `base_url`
    pub fn connect(base_url: impl AsRef<str>) -> Result<Self, CallError> {
        Ok(Self::new(Reqwest::new(base_url)?))
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::entities::{RawResponse, StatusBody, StreamFrame};
    pub use crate::error::CallError;
    pub use crate::use_cases::ports::Transport;
    pub use crate::use_cases::{Client, FrameDecoder};

    #[cfg(feature = "reqwest")]
    pub use crate::{DefaultClient, Reqwest};

    pub use tonic::Code;
}
