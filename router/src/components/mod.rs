mod outlet;
mod redirect;
mod route;
mod router;
mod routes;

pub use outlet::*;
pub use redirect::*;
pub use route::*;
pub use router::*;
pub use routes::*;
