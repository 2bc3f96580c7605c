use deferred_factory::{DeferredCall, deferred};

#[derive(Debug, Clone, PartialEq)]
pub struct Invalid;

#[deferred]
fn checked_sqrt(value: f64) -> Result<f64, Invalid> {
    if value < 0.0 { Err(Invalid) } else { Ok(value.sqrt()) }
}

fn main() {
    let sqrt = checked_sqrt();
    let call: DeferredCall<f64, Invalid> = sqrt.call(-1.0);
    assert_eq!(call.eval(), Err(Invalid));
}
