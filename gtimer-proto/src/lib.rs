//! Generated wire types for the gtimer services.
//!
//! `gtimer` carries the timer contract (`GreeterTimer/TimeGreetings`);
//! `greeting` carries the downstream Greeter contract that timed runs are
//! driven against.

pub mod gtimer {
    tonic::include_proto!("gtimer");
}

pub mod greeting {
    tonic::include_proto!("greeting");
}
