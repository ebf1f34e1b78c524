//! simpletools Demo Application
//!
//! Runs the introductory examples on an STM32G474 Nucleo board: blinks the
//! status LED with `high`/`low`/`pause`, then ramps a PWM signal generated in
//! a background context while the main task keeps timing the RC sensor.

#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_stm32::pac;
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use simpletools::config::pins;
use simpletools::hal::{GpioContext, GpioContexts};
use simpletools::prelude::*;
use simpletools::signal::{Activity, Worker};

static CONTEXTS: StaticCell<GpioContexts> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("simpletools demo v{}", env!("CARGO_PKG_VERSION"));

    // GPIO clocks are enabled by init
    let _p = embassy_stm32::init(embassy_stm32::Config::default());
    let contexts: &'static GpioContexts = CONTEXTS.init(GpioContexts::new(pac::GPIOA));
    let mut io = contexts.main().unwrap();

    let led = Pin::new(pins::LED_STATUS).unwrap();
    let pwm_pin = Pin::new(pins::PWM_OUT).unwrap();
    let sensor = Pin::new(pins::RC_SENSOR).unwrap();

    // Blink: the first example of every course
    for _ in 0..3 {
        io.pins_mut().high(led).unwrap();
        io.pause(100);
        io.pins_mut().low(led).unwrap();
        io.pause(400);
    }
    info!("Blink done, starting PWM");

    let (mut pwm, worker) = Pwm::start(contexts, 1_000).unwrap();
    spawner.spawn(generator_task(worker)).unwrap();

    let mut high_us = 0;
    loop {
        if let Err(e) = pwm.set(Channel::A, pwm_pin, high_us) {
            warn!("PWM update failed: {}", e);
        }
        high_us = (high_us + 50) % pwm.cycle_us();

        // Charge the RC sensor, then time its decay
        io.pins_mut().high(sensor).unwrap();
        Timer::after(Duration::from_millis(1)).await;
        match io.rc_time(sensor, Level::High) {
            Ok(Some(decay)) => info!("RC decay {} us, PWM high {} us", decay, high_us),
            Ok(None) => info!("RC decay timed out"),
            Err(e) => warn!("rc_time failed: {}", e),
        }
        io.pins_mut().toggle(led).unwrap();

        Timer::after(Duration::from_millis(100)).await;
    }
}

/// Generator task - services the PWM worker between other tasks
#[embassy_executor::task]
async fn generator_task(mut worker: Worker<'static, GpioContext<'static>>) {
    while worker.service() == Activity::Running {
        yield_now().await;
    }
    info!("PWM generator finished");
}
