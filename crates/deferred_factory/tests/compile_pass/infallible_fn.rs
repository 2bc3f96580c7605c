use deferred_factory::deferred;

#[deferred]
pub fn area(width: u32, height: u32) -> u32 {
    width * height
}

fn main() {
    let area = area();
    let call = area.call(3, 4);
    assert_eq!(*call.get(), 12);
}
