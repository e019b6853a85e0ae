//! Domain core: the RUT codec, the validation schema set, the session
//! store and the multi-step flow controllers.

pub mod flow;
pub mod rut;
pub mod session;
pub mod validate;
