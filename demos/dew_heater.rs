//! Dew heater on a telescope corrector, held a few degrees above the dew point
//! Run with: cargo run --example dew_heater

use heater_pid::{PidBuilder, Timestamp};

fn main() {
    println!("=== Dew Heater Control ===\n");

    // Duty cycle in percent, one sample per sensor poll
    let mut pid = PidBuilder::new()
        .gains(0.8, 0.05, 0.2)
        .output_limits(0.0, 100.0)
        .try_build()
        .expect("valid heater configuration");

    let ambient = 1.5;
    let dew_point = 0.5;
    let margin = 5.0;
    let mut lens = ambient;

    let poll_secs = 2;
    let mut now = Timestamp::from_secs(0);

    println!("Time(s) | Lens(°C) | Target(°C) | Duty(%) | P      | I      | D");
    println!("--------|----------|------------|---------|--------|--------|-------");

    for i in 0..300 {
        // The dew point drifts as the night cools
        let target = dew_point - (i as f64) * 0.005 + margin;

        let duty = match pid.update(target, lens, now) {
            Ok(duty) => duty,
            Err(err) => {
                eprintln!("skipped tick: {err}");
                continue;
            }
        };

        // Heater warms the lens, air cools it back toward ambient
        lens += duty * 0.004 * poll_secs as f64 - (lens - ambient) * 0.02 * poll_secs as f64;

        if i % 15 == 0 {
            let c = pid.corrections();
            println!(
                "{:7} | {:8.2} | {:10.2} | {:7.2} | {:6.2} | {:6.2} | {:6.2}",
                now.as_secs(),
                lens,
                target,
                duty,
                c.p,
                c.i,
                c.d
            );
        }

        now = now.advanced_by(poll_secs);
    }

    println!("\n{pid}");
}
