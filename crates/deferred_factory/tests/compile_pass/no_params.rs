use deferred_factory::deferred;

#[deferred]
fn unit() {}

fn main() {
    let unit = unit();
    let call = unit.call();
    call.get();
    assert!(call.is_evaluated());
}
