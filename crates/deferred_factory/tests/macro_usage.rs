//! Integration tests for the `#[deferred]` attribute macro.


use deferred_factory::prelude::*;
use test_utils::EventLog;

#[deferred]
/// Divides `a` by `b`.
fn divide(a: f64, b: f64) -> f64 {
    a / b
}

#[deferred]
fn parse_port(text: String) -> Result<u16, String> {
    text.parse().map_err(|_| format!("invalid port: {text}"))
}

#[deferred]
fn answer() -> u32 {
    42
}

#[deferred]
fn join_words(mut words: Vec<String>, separator: char) -> String {
    words.retain(|word| !word.is_empty());
    words.join(&separator.to_string())
}

#[test]
fn generated_factory_defers_the_body() {
    let divide = divide();
    let call = divide.call(5.0, 2.0);

    assert_eq!(call.state(), CallState::NotEvaluated);
    assert_eq!(call.name(), "divide");
    assert_eq!(*call.get(), 2.5);
}

#[test]
fn generated_factory_derefs_to_lazy_factory() {
    let divide = divide();
    let calls = [divide.call(5.0, 5.0), divide.call(5.0, 2.0), divide.call(3.0, 4.0)];

    let results = divide.run_all(&calls).expect("infallible");
    let values: Vec<f64> = results.values().map(|value| **value).collect();

    assert_eq!(values, vec![1.0, 2.5, 0.75]);
    assert_eq!(divide.name(), "divide");
}

#[test]
fn result_return_type_is_fallible() {
    let parse_port = parse_port();

    let bad = parse_port.call("http".to_string());
    assert_eq!(bad.eval(), Err("invalid port: http".to_string()));
    assert_eq!(bad.state(), CallState::NotEvaluated);

    let good = parse_port.call("8080".to_string());
    assert_eq!(good.value(), Ok(8080));
}

#[test]
fn zero_and_mut_parameters() {
    assert_eq!(*answer().call().get(), 42);

    let words = vec!["a".to_string(), String::new(), "b".to_string()];
    assert_eq!(*join_words().call(words, '-').get(), "a-b");
}

#[test]
fn with_config_attaches_hooks_and_ids() {
    let log = EventLog::new();
    let divide = DivideDeferred::with_config(|mut builder| {
        log.attach(builder.hooks_mut());
        builder.id_generator(ids_from_fn(|| "fixed"))
    });

    let call = divide.call(1.0, 4.0);
    call.get();

    assert_eq!(call.id().as_str(), "fixed");
    assert_eq!(log.schedules(), vec!["OnInit", "OnEval"]);
}
