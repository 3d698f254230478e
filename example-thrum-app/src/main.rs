use example_thrum_app::{Calculator, calc::DivByZero, spawn_loopback};
use thrum_client::CallError;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (mut client, server) = spawn_loopback(Calculator::with_capacity(2)).unwrap();

    println!("add(2, 3) = {:?}", client.add(2, 3));
    println!("div(12, 4) = {:?}", client.div(12, 4));

    match client.div(4, 0) {
        Err(CallError::Declared(exception)) => {
            println!("div(4, 0) raised {:?}", DivByZero::from_exception(&exception));
        }
        other => println!("div(4, 0) = {:?}", other),
    }

    println!("ping() = {:?}", client.ping());
    println!("recall() before remember = {:?}", client.recall());

    for value in [7, 11, 13] {
        println!("remember({}) = {:?}", value, client.remember(value));
    }

    println!("recall() = {:?}", client.recall());
    println!("sum([1, 2, 3, 4]) = {:?}", client.sum(&[1, 2, 3, 4]));

    drop(client);

    match server.join() {
        Ok(result) => println!("Server finished: {:?}", result),
        Err(_) => println!("Server thread panicked"),
    }
}
