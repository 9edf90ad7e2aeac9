pub mod ingress;

pub use ingress::{CheckOutcome, IngressService};
