//! The control loop: routes events to the stateful parts in a fixed order.
//!
//! Everything runs on one logical thread. Interrupt side code only enqueues
//! [`Event`]s; [`PowerSupply::service`] drains them and then performs one idle
//! pass: buttons, menu pause, current sensors, analog sampling, display.
use core::ops::ControlFlow;

use defmt_or_log as log;

use crate::config::PsuConfig;
use crate::error::{Error, ErrorKind};
use crate::events::{Event, EventConsumer};
use crate::input::{Button, ButtonInput, ButtonPins, Edge};
use crate::menu::{Action, MenuContext, MenuEngine, MenuTable, PSU_TABLE};
use crate::sampler::{AnalogConverter, SensorSampler};
use crate::ui::{DisplayPresenter, LimitLine, LimitMarker, TextDisplay};
use crate::units::Millis;
use crate::vcp_sensors::{
    CurrentMonitor, CurrentSensor, LimitEditor, SUPPLY_COUNT, Supply, SupplyOutputs,
};

/// Hardware collaborators of the control core.
pub struct Board<S, A, O, D, B> {
    /// Current sensors indexed by supply
    pub sensors: [S; SUPPLY_COUNT],
    pub adc: A,
    pub outputs: O,
    pub display: D,
    pub buttons: B,
}

/// Everything the menu actions may touch.
pub struct ControlCore<S, A, O, D> {
    config: PsuConfig,
    sensors: [S; SUPPLY_COUNT],
    adc: A,
    outputs: O,
    display: D,
    sampler: SensorSampler,
    monitor: CurrentMonitor,
    limits: LimitEditor,
    presenter: DisplayPresenter,
    adc_channel: u8,
    sensors_due: bool,
    conversion_ready: bool,
}

impl<S, A, O, D> ControlCore<S, A, O, D>
where
    S: CurrentSensor,
    A: AnalogConverter,
    O: SupplyOutputs,
    D: TextDisplay,
{
    pub fn monitor(&self) -> &CurrentMonitor {
        &self.monitor
    }

    pub fn sampler(&self) -> &SensorSampler {
        &self.sampler
    }

    pub fn limits(&self) -> &LimitEditor {
        &self.limits
    }

    pub fn presenter(&self) -> &DisplayPresenter {
        &self.presenter
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn outputs(&self) -> &O {
        &self.outputs
    }

    fn poll_sensors(&mut self) {
        if !self.sensors_due {
            return;
        }
        self.sensors_due = false;
        for supply in Supply::ALL {
            let limit_ma = self.limits.accepted(supply).limit_ma();
            let sensor = &mut self.sensors[supply.index()];
            if self.monitor.poll(supply, sensor, limit_ma, &mut self.outputs) {
                self.presenter.mark_dirty();
            }
        }
    }

    fn sample_analog(&mut self) {
        if !self.conversion_ready {
            return;
        }
        self.conversion_ready = false;
        let raw = self.adc.last_conversion();
        if self.sampler.add_sample(self.adc_channel, raw) && self.presenter.shows_analog() {
            self.presenter.mark_dirty();
        }
        self.adc_channel = SensorSampler::next_channel(self.adc_channel);
        self.adc.start_conversion(self.adc_channel);
    }

    fn show_limit(&mut self, supply: Supply, marker: LimitMarker) {
        let line = LimitLine {
            supply,
            limit_ma: self.limits.adjusted(supply).limit_ma(),
            marker,
        };
        self.presenter.show_current_limit(&mut self.display, line);
    }

    /// Drives every protective output to the safe state.
    fn shut_down(&mut self) {
        for supply in Supply::ALL {
            self.outputs.set_shutdown(supply, true);
        }
        self.outputs.set_indicator(true);
    }
}

impl<S, A, O, D> MenuContext<Action> for ControlCore<S, A, O, D>
where
    S: CurrentSensor,
    A: AnalogConverter,
    O: SupplyOutputs,
    D: TextDisplay,
{
    fn show(&mut self, text: &'static str) {
        self.presenter.show_prompt(&mut self.display, text);
    }

    fn execute(&mut self, action: Action) {
        log::debug!("Menu action {:?}", action);
        match action {
            Action::ShowTelemetry => self.presenter.release_to_telemetry(),
            Action::NextLine0 => self.presenter.next_line_mode(0),
            Action::NextLine1 => self.presenter.next_line_mode(1),
            Action::SelectSupplyA | Action::SelectSupplyB => {
                let supply = if action == Action::SelectSupplyA {
                    Supply::A
                } else {
                    Supply::B
                };
                self.limits.select(supply);
                self.show_limit(supply, LimitMarker::Supply);
            }
            Action::AdjustCurLimit => self.show_limit(self.limits.selected(), LimitMarker::Value),
            Action::ShowCurLimit => self.show_limit(self.limits.selected(), LimitMarker::None),
            Action::IncCurLimit => self.limits.increment(),
            Action::DecCurLimit => self.limits.decrement(),
            Action::AcceptCurLimit => {
                self.limits.accept();
                for supply in Supply::ALL {
                    log::info!(
                        "Supply {:?} limit {} mA",
                        supply,
                        self.limits.accepted(supply).limit_ma()
                    );
                }
                self.monitor.reset_current_limit(&mut self.outputs);
            }
            Action::RejectCurLimit => self.limits.reject(),
        }
    }
}

/// The instrument: menu, control core and button scanning.
pub struct PowerSupply<S, A, O, D, B> {
    menu: MenuEngine<Action>,
    core: ControlCore<S, A, O, D>,
    buttons: B,
    button_input: ButtonInput,
    halted: bool,
}

impl<S, A, O, D, B> PowerSupply<S, A, O, D, B>
where
    S: CurrentSensor,
    A: AnalogConverter,
    O: SupplyOutputs,
    D: TextDisplay,
    B: ButtonPins,
{
    pub fn new(board: Board<S, A, O, D, B>, config: PsuConfig) -> Self {
        Self::with_menu(board, config, PSU_TABLE)
    }

    pub fn with_menu(board: Board<S, A, O, D, B>, config: PsuConfig, table: MenuTable<Action>) -> Self {
        let Board {
            sensors,
            adc,
            outputs,
            display,
            buttons,
        } = board;
        Self {
            menu: MenuEngine::new(table),
            core: ControlCore {
                sampler: SensorSampler::new(config.adc_reference_mv),
                config,
                sensors,
                adc,
                outputs,
                display,
                monitor: CurrentMonitor::new(),
                limits: LimitEditor::new(),
                presenter: DisplayPresenter::new(),
                adc_channel: 0,
                sensors_due: false,
                conversion_ready: false,
            },
            buttons,
            button_input: ButtonInput::new(),
            halted: false,
        }
    }

    pub fn core(&self) -> &ControlCore<S, A, O, D> {
        &self.core
    }

    pub fn menu(&self) -> &MenuEngine<Action> {
        &self.menu
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Configures the sensors, releases the outputs, starts sampling and the menu.
    pub fn start(&mut self, now: Millis) -> ControlFlow<()> {
        log::info!("Power supply starting");
        let range = self.core.config.sensor_range;
        for supply in Supply::ALL {
            if self.core.sensors[supply.index()].set_range(range).is_err() {
                return self.report(Error::SensorConfig(supply), now);
            }
        }
        self.core.monitor.reset_current_limit(&mut self.core.outputs);

        self.core.adc_channel = 0;
        self.core.adc.start_conversion(0);

        if let Err(e) = self.menu.start(&mut self.core, now) {
            return self.report(e.into(), now);
        }
        ControlFlow::Continue(())
    }

    /// Handles one event. `Break` means the supply halted on a fatal error.
    pub fn handle(&mut self, event: Event, now: Millis) -> ControlFlow<()> {
        if self.halted {
            return ControlFlow::Break(());
        }
        match event {
            Event::Idle => self.idle(now),
            Event::ConversionComplete => {
                self.core.conversion_ready = true;
                ControlFlow::Continue(())
            }
            Event::TimerTick => {
                self.core.sensors_due = true;
                ControlFlow::Continue(())
            }
            Event::ButtonPressed(button) => self.press(button, now),
            Event::ButtonReleased(button) => {
                log::trace!("{:?} released", button);
                ControlFlow::Continue(())
            }
        }
    }

    /// Drains the event queue, then runs one idle pass.
    pub fn service<const N: usize>(
        &mut self,
        events: &mut EventConsumer<'_, N>,
        now: Millis,
    ) -> ControlFlow<()> {
        let dropped = events.take_dropped();
        if dropped > 0 && self.report(Error::EventsDropped(dropped), now).is_break() {
            return ControlFlow::Break(());
        }
        while let Some(event) = events.dequeue() {
            if self.handle(event, now).is_break() {
                return ControlFlow::Break(());
            }
        }
        self.handle(Event::Idle, now)
    }

    /// Shows an error. Notes and warnings clear themselves, fatal errors halt.
    pub fn report(&mut self, error: Error, now: Millis) -> ControlFlow<()> {
        let kind = error.kind();
        let until = match kind {
            ErrorKind::Note | ErrorKind::Warning => {
                log::warn!("{:?} ({:#x}): {}", error, error.code(), error.error_description());
                Some(now + self.core.config.notice_duration)
            }
            ErrorKind::Fatal => {
                log::error!("{:?} ({:#x}): {}", error, error.code(), error.error_description());
                None
            }
        };
        self.core
            .presenter
            .show_notice(&mut self.core.display, kind, error.code(), until);

        if kind == ErrorKind::Fatal {
            self.core.shut_down();
            self.halted = true;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    fn press(&mut self, button: Button, now: Millis) -> ControlFlow<()> {
        match self.menu.press(button, &mut self.core, now) {
            Ok(_) => ControlFlow::Continue(()),
            Err(e) => self.report(e.into(), now),
        }
    }

    fn idle(&mut self, now: Millis) -> ControlFlow<()> {
        let raw = self.buttons.read();
        for event in self.button_input.poll(raw) {
            if event.edge == Edge::Pressed && self.press(event.button, now).is_break() {
                return ControlFlow::Break(());
            }
        }

        if let Err(e) = self.menu.poll(&mut self.core, now) {
            return self.report(e.into(), now);
        }

        self.core.poll_sensors();
        self.core.sample_analog();

        let core = &mut self.core;
        core.presenter.expire_notice(&mut core.display, now);
        core.presenter
            .render(&mut core.display, &core.monitor, &core.sampler);
        ControlFlow::Continue(())
    }
}
