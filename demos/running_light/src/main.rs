#![no_std]
#![no_main]

use defmt::unwrap;
use embassy_executor::Spawner;
use embassy_nrf_ws2812b_pwm::Ws2812bPwm;
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;
use ws2812b_pulse::{Color, Pattern, PulseBuffer, PulseSinkAsync as _};
use {defmt_rtt as _, panic_probe as _};

const NUM_LEDS: usize = 8;
const BUFFER_SIZE: usize = NUM_LEDS * 24;
static LED_BUFFER: StaticCell<[u16; BUFFER_SIZE]> = StaticCell::new();

/// Peak channel value, keeps the strip at a quarter of full brightness.
const BRIGHTNESS: u8 = 64;
const STEP: u8 = 2;
const RAMP: usize = (BRIGHTNESS / STEP) as usize;
const SEQUENCE_LEN: usize = 6 * RAMP;

/// Red to yellow to green to cyan to blue to magenta and back to red.
const fn gradient() -> [Color; SEQUENCE_LEN] {
    let max = BRIGHTNESS - 1;
    let mut sequence = [Color::new(0, 0, 0); SEQUENCE_LEN];
    let mut k = 0;
    while k < RAMP {
        let i = STEP - 1 + k as u8 * STEP;
        sequence[k] = Color::new(max, i, 0);
        sequence[RAMP + k] = Color::new(max - i, max, 0);
        sequence[2 * RAMP + k] = Color::new(0, max, i);
        sequence[3 * RAMP + k] = Color::new(0, max - i, max);
        sequence[4 * RAMP + k] = Color::new(i, 0, max);
        sequence[5 * RAMP + k] = Color::new(max, 0, max - i);
        k += 1;
    }
    sequence
}

static SEQUENCE: [Color; SEQUENCE_LEN] = gradient();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());

    let buf = LED_BUFFER.init([0u16; BUFFER_SIZE]);
    let mut ws: Ws2812bPwm<BUFFER_SIZE> = unwrap!(Ws2812bPwm::new(p.PWM0, p.P0_13, buf));
    let encoder = *ws.encoder();

    // The offset lives here, the driver only ever sees finished frames.
    let mut pattern = Pattern::new(&SEQUENCE);
    let mut frame: PulseBuffer<BUFFER_SIZE> = unwrap!(pattern.render(&encoder, NUM_LEDS));

    defmt::info!("Running {} colors over {} LEDs", SEQUENCE_LEN, NUM_LEDS);

    loop {
        unwrap!(ws.send(&frame).await);

        let offset = pattern.advance(1);
        unwrap!(frame.rotate_one(&encoder, pattern.sequence(), offset as isize));

        Timer::after(Duration::from_millis(50)).await;
    }
}
