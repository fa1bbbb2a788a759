//! Multi-Radio Jammer Main Application
//!
//! Entry point for the STM32G474 jammer firmware.
//! Initializes hardware, spawns the serial reply and LED tasks and runs the
//! controller tick loop. Commands are drained from the receive ring at tick
//! boundaries and, during a bring-up, between attempts.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::{debug, info, warn};
use embassy_executor::Spawner;
use embassy_stm32::adc::{Adc, AdcChannel};
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::mode::Async;
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{self, Uart, UartTx};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::Ticker;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use jammer_firmware::drivers::nrf24::Nrf24;
use jammer_firmware::hal::adc::SupplySensor;
use jammer_firmware::hal::gpio::{StatusLed, StopButton};
use jammer_firmware::hal::serial::{OperatorInput, SerialPort};
use jammer_firmware::hal::spi::{RadioSpi, SharedSpi, SpiControl};
use jammer_firmware::hal::timer::{EmbassyClock, TickBudget};
use jammer_firmware::prelude::*;
use jammer_firmware::protocol::{dispatch, Response};

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    USART2 => usart::InterruptHandler<peripherals::USART2>;
});

/// Shared SPI bus, borrowed by the three radios and the bus controller
static SPI_BUS: StaticCell<RefCell<SharedSpi<'static>>> = StaticCell::new();

/// DMA ring the USART receiver writes into
static RX_RING: StaticCell<[u8; SERIAL_RX_RING_SIZE]> = StaticCell::new();

/// Replies waiting to be written back
static RESPONSES: Channel<CriticalSectionRawMutex, Response, COMMAND_QUEUE_DEPTH> =
    Channel::new();

/// Latest jammer activity for the LED task
static ACTIVITY: Signal<CriticalSectionRawMutex, Activity> = Signal::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Jammer Firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    // Status LED and stop button
    let led = StatusLed::new(Output::new(p.PA5, Level::Low, Speed::Low));
    let stop_button = StopButton::new(Input::new(p.PC13, Pull::Up));

    // SPI1 shared by all three radios: PB3 = SCK, PB4 = MISO, PB5 = MOSI
    let mut spi_config = spi::Config::default();
    spi_config.frequency = Hertz(SPI_FREQUENCY_HZ);
    let spi = Spi::new_blocking(p.SPI1, p.PB3, p.PB5, p.PB4, spi_config);
    let bus: &'static RefCell<SharedSpi<'static>> =
        SPI_BUS.init(RefCell::new(SharedSpi::new(spi, spi_config)));

    info!("SPI1 initialized at {}Hz", SPI_FREQUENCY_HZ);

    let radio1 = Nrf24::new(
        RadioSpi::new(bus, Output::new(p.PA9, Level::High, Speed::VeryHigh)),
        Output::new(p.PA8, Level::Low, Speed::Low),
    );
    let radio2 = Nrf24::new(
        RadioSpi::new(bus, Output::new(p.PB1, Level::High, Speed::VeryHigh)),
        Output::new(p.PB0, Level::Low, Speed::Low),
    );
    let radio3 = Nrf24::new(
        RadioSpi::new(bus, Output::new(p.PC7, Level::High, Speed::VeryHigh)),
        Output::new(p.PC6, Level::Low, Speed::Low),
    );

    // Sub-GHz module on the same bus, held off while the jammer runs
    let control = SpiControl::new(bus, Output::new(p.PB10, Level::Low, Speed::Low));

    // Supply sense on PA0 (ADC1_IN1) behind a 2:1 divider
    let sensor = SupplySensor::new(Adc::new(p.ADC1), p.PA0.degrade_adc());

    // USART2 command port: PA2 = TX, PA3 = RX
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = COMMAND_BAUD_RATE;
    let uart = Uart::new(
        p.USART2,
        p.PA3,
        p.PA2,
        Irqs,
        p.DMA1_CH1,
        p.DMA1_CH2,
        uart_config,
    )
    .unwrap();
    let (tx, rx) = uart.split();
    let serial = SerialPort::new(rx.into_ring_buffered(RX_RING.init([0; SERIAL_RX_RING_SIZE])));

    info!("USART2 initialized at {} baud", COMMAND_BAUD_RATE);

    spawner.spawn(command_tx_task(tx)).unwrap();
    spawner.spawn(status_led_task(led)).unwrap();

    // Stop button or a queued STOP/PAUSE aborts a bring-up between attempts
    let operator = OperatorInput {
        button: stop_button,
        serial,
    };

    let mut jammer = Jammer::new(
        [radio1, radio2, radio3],
        control,
        sensor,
        EmbassyClock::new(),
        operator,
        JammerConfig::default(),
    );

    info!("Tasks spawned, entering tick loop");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    let mut budget = TickBudget::new(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        ticker.next().await;
        budget.begin();

        if jammer.cancel_mut().button.update() && jammer.is_active() {
            warn!("stop button pressed");
            jammer.stop();
        }

        while let Some(command) = jammer.cancel_mut().serial.next_command() {
            info!("command {}", command);
            let mut response = Response::new();
            dispatch(&mut jammer, &command, &mut response);
            if RESPONSES.try_send(response).is_err() {
                warn!("response queue full, reply dropped");
            }
        }

        jammer.tick();
        ACTIVITY.signal(jammer.activity());

        if let Some(elapsed) = budget.end() {
            debug!("tick overran: {}ms", elapsed.as_millis());
        }
    }
}

/// Serial transmit task - writes replies back to the host
#[embassy_executor::task]
async fn command_tx_task(mut tx: UartTx<'static, Async>) {
    loop {
        let response = RESPONSES.receive().await;
        if tx.write(response.as_bytes()).await.is_err() {
            warn!("USART transmit error");
        }
    }
}

/// Status LED task - solid when transmitting, blinking when paused
#[embassy_executor::task]
async fn status_led_task(mut led: StatusLed<'static>) {
    let mut activity = Activity::Inactive;
    let mut ticker = Ticker::every(Duration::from_millis(250));

    loop {
        if let Some(latest) = ACTIVITY.try_take() {
            activity = latest;
        }
        led.show(activity);
        ticker.next().await;
    }
}
