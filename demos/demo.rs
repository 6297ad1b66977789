use timeconv::{now_nanos, SecondsAndMicros, SecondsAndNanos, MAX_REPRESENTABLE_SECONDS};

fn main() {
    // Current time
    let now = SecondsAndNanos::now();
    println!("Now: {}s + {}ns", now.seconds, now.nanos);
    match now_nanos() {
        Ok(ns) => println!("Now as nanoseconds: {}", ns),
        Err(e) => println!("Now does not fit: {}", e),
    }

    // Decomposition, including before the epoch
    for v in [573_291_173, -3_989_335_159, i64::MAX, i64::MIN] {
        let ts = SecondsAndNanos::from_nanos(v);
        let tv = SecondsAndMicros::from_nanos(v);
        println!(
            "{:>20} -> timespec ({}, {}) -> timeval ({}, {}) -> {:?}",
            v,
            ts.seconds,
            ts.nanos,
            tv.seconds,
            tv.micros,
            tv.to_nanos()
        );
    }

    // Range checks
    for secs in [MAX_REPRESENTABLE_SECONDS, MAX_REPRESENTABLE_SECONDS + 1] {
        let ts = SecondsAndNanos::new(secs, 0);
        println!(
            "{}s representable: {}",
            secs,
            ts.is_representable_as_nanoseconds()
        );
    }

    // Overflow is reported, not wrapped
    if let Err(e) = SecondsAndMicros::new(1 << 34, 0).to_nanos() {
        println!("Rejected: {}", e);
    }
}
