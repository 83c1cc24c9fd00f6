pub mod dotnet;
pub mod traits;
pub mod types;

pub use dotnet::DotNetClient;
pub use traits::*;
pub use types::*;
