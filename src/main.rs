#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;
use rtic::app;

#[app(device = rp_pico::hal::pac, peripherals = true, dispatchers = [I2C0_IRQ])]
mod app {
    use bold_hours::{Canvas, ClockSample, FaceConfig, MemLcd, TimeUnits, WatchFace};
    use defmt::{info, warn};
    use embedded_hal::digital::v2::{OutputPin, ToggleableOutputPin};
    use rp_pico::hal::{
        clocks::{init_clocks_and_plls, Clock},
        fugit::{ExtU32, RateExtU32},
        gpio::{
            bank0::{Gpio14, Gpio17, Gpio18, Gpio19, Gpio25},
            FunctionSio, FunctionSpi, Pin, PullDown, SioOutput,
        },
        pac,
        sio::Sio,
        spi::{Enabled, Spi},
        timer::{Alarm, Alarm0, Alarm1, Timer},
        watchdog::Watchdog,
    };

    // Sharp memory LCD on SPI0, write only
    type Spi0 = Spi<
        Enabled,
        pac::SPI0,
        (
            Pin<Gpio19, FunctionSpi, PullDown>,
            Pin<Gpio18, FunctionSpi, PullDown>,
        ),
    >;
    type OutPin<G> = Pin<G, FunctionSio<SioOutput>, PullDown>;
    type Lcd = MemLcd<Spi0, OutPin<Gpio17>>;

    /// Wall clock the firmware boots with.
    const START: (i32, u8, u8, u8, u8, u8) = (2024, 1, 1, 12, 34, 56);
    const TICK_US: u32 = 1_000_000;
    const PULSE_US: u32 = 300_000;

    // Shared resources (accessed by multiple tasks)
    #[shared]
    struct Shared {
        clock: ClockSample,
        motor: OutPin<Gpio14>,
        alarm1: Alarm1,
    }

    // Local resources (accessed by single tasks)
    #[local]
    struct Local {
        face: WatchFace<Canvas>,
        lcd: Lcd,
        led: OutPin<Gpio25>,
        alarm: Alarm0,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let mut alarm = timer.alarm_0().unwrap();
        // First tick in 1 second
        alarm.schedule(TICK_US.micros()).unwrap();
        alarm.enable_interrupt();

        let mut alarm1 = timer.alarm_1().unwrap();
        alarm1.enable_interrupt();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let led = pins.led.into_push_pull_output();
        let mut motor = pins.gpio14.into_push_pull_output();
        motor.set_low().ok();

        let mosi = pins.gpio19.into_function::<FunctionSpi>();
        let sck = pins.gpio18.into_function::<FunctionSpi>();
        let cs = pins.gpio17.into_push_pull_output();

        let spi = Spi::<_, _, _, 8>::new(pac.SPI0, (mosi, sck));
        let spi = spi.init(
            &mut pac.RESETS,
            clocks.peripheral_clock.freq(),
            1_000_000u32.Hz(),
            &embedded_hal::spi::MODE_0,
        );

        let (year, month, day, hour, minute, second) = START;
        let clock = ClockSample::from_calendar(year, month, day, hour, minute, second).unwrap();

        let config = FaceConfig::DEFAULT;
        info!("bold hours: {}, {}", clock, config);

        let mut lcd = MemLcd::new(spi, cs);
        lcd.blank().unwrap();

        let mut face = WatchFace::new(Canvas::new(), config);
        face.init(&clock);
        redraw(&mut face, &mut lcd);

        (
            Shared {
                clock,
                motor,
                alarm1,
            },
            Local {
                face,
                lcd,
                led,
                alarm,
            },
            init::Monotonics(),
        )
    }

    /// Draws the canvas when something changed, otherwise keeps VCOM alternating.
    /// A frame that failed to draw is never flushed.
    fn redraw(face: &mut WatchFace<Canvas>, lcd: &mut Lcd) {
        let canvas = face.platform_mut();
        let result = if !canvas.take_dirty() {
            lcd.toggle_vcom()
        } else if let Err(err) = canvas.draw(lcd) {
            // Keep the last good frame on the panel.
            warn!("draw failed: {}", err);
            lcd.toggle_vcom()
        } else {
            lcd.flush()
        };
        if let Err(err) = result {
            warn!("lcd write failed: {}", err);
        }
    }

    // Hardware Task: Timer Interrupt (1Hz)
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [clock], local = [alarm, led])]
    fn timer_tick(mut ctx: timer_tick::Context) {
        // Clear interrupt and schedule next
        ctx.local.alarm.clear_interrupt();
        if ctx.local.alarm.schedule(TICK_US.micros()).is_err() {
            warn!("tick alarm not re-armed");
        }

        ctx.local.led.toggle().ok();

        let units = ctx.shared.clock.lock(|c| c.tick());

        update_display::spawn(units).ok();
    }

    // Software Task: reduce the tick and put it on the panel
    #[task(shared = [clock, motor, alarm1], local = [face, lcd])]
    fn update_display(mut ctx: update_display::Context, units: TimeUnits) {
        let sample = ctx.shared.clock.lock(|c| *c);
        let face = ctx.local.face;

        let before = face.state().map(|s| s.hour_index);
        face.on_tick(&sample, units);
        let after = face.state().map(|s| s.hour_index);
        if before != after {
            info!("hour numeral {} -> {}", before, after);
        }

        if face.platform_mut().take_pulse() {
            info!("hour pulse");
            (ctx.shared.motor, ctx.shared.alarm1).lock(|motor, alarm| {
                motor.set_high().ok();
                alarm.clear_interrupt();
                if alarm.schedule(PULSE_US.micros()).is_err() {
                    warn!("pulse alarm not armed");
                }
            });
        }

        redraw(face, ctx.local.lcd);
    }

    // Hardware Task: end of a haptic pulse (Timer 1)
    #[task(binds = TIMER_IRQ_1, priority = 1, shared = [motor, alarm1])]
    fn motor_stop(ctx: motor_stop::Context) {
        (ctx.shared.motor, ctx.shared.alarm1).lock(|motor, alarm| {
            alarm.clear_interrupt();
            motor.set_low().ok();
        });
    }
}
