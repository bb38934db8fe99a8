use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Instant;

use crossbeam_channel::{bounded, select, tick, Receiver};

use trucktweaks_control::Performer;
use trucktweaks_input::{
    Backend, CaptureController, Detection, DeviceCatalog, DeviceId, DeviceSession, LogWarnings,
    SdlBackend, SAMPLE_INTERVAL,
};
use trucktweaks_settings::{
    load_settings, save_settings, Action, ConfigDir, InputBindings, SettingsEvent,
};

use crate::app::{resolve_device, BindingEditor, DeviceLink, MouseSimulator, Outcome};
use crate::error::Error;
use crate::runner::OutputRunner;

fn stop_channel() -> Result<Receiver<()>, Error> {
    let (stop_tx, stop_rx) = bounded(1);
    ctrlc::set_handler(move || {
        let _ = stop_tx.try_send(());
    })?;
    Ok(stop_rx)
}

fn open_session() -> DeviceSession<SdlBackend> {
    DeviceSession::new(SdlBackend::new(), LogWarnings)
}

pub(crate) fn devices(dir: &ConfigDir) -> Result<(), Error> {
    let settings = load_settings(&dir.settings_path())?;
    let mut session = open_session();
    let catalog = DeviceCatalog::new();

    for device in catalog.entries(&mut session) {
        let marker = if device.id == settings.input_device_id {
            "*"
        } else {
            " "
        };
        log::info!("{marker} {} {}", device.id, device.name);
    }
    Ok(())
}

pub(crate) fn bindings(dir: &ConfigDir) -> Result<(), Error> {
    let settings = load_settings(&dir.settings_path())?;
    log::info!(
        "mouse simulation: {:?}, sensitivity {}",
        settings.mouse_simulation_mode,
        settings.mouse_simulation_sensitivity
    );
    if settings.input_device_id.is_none() {
        log::info!("input device: <none>");
    } else {
        log::info!(
            "input device: {} {}",
            settings.input_device_name,
            settings.input_device_id
        );
    }
    for (action, binding) in settings.input_bindings.iter() {
        log::info!("{:<14} {binding}", action.label());
    }
    Ok(())
}

fn binding_editor(
    session: DeviceSession<SdlBackend>,
    bindings: &Rc<RefCell<InputBindings>>,
) -> BindingEditor<SdlBackend> {
    BindingEditor::new(CaptureController::new(session), Rc::clone(bindings))
}

/// Starts capturing `action`. A capture that completes right away
/// (no device, failed acquire) is an error.
fn start_capture<B: Backend>(editor: &mut BindingEditor<B>, action: Action) -> Result<(), Error> {
    editor.assign(action);
    if editor.is_capturing(action) {
        return Ok(());
    }
    editor.take_outcome();
    Err(Error::CaptureNotStarted(action))
}

fn captured(outcome: Option<Outcome>, action: Action) -> Result<Detection, Error> {
    outcome
        .filter(|outcome| outcome.action == action)
        .and_then(|outcome| outcome.detection)
        .ok_or(Error::NothingCaptured(action))
}

pub(crate) fn capture(
    dir: &ConfigDir,
    action: Action,
    device: Option<&str>,
) -> Result<(), Error> {
    let stop_rx = stop_channel()?;
    let path = dir.settings_path();
    let mut settings = load_settings(&path)?;
    let bindings = Rc::new(RefCell::new(settings.input_bindings));
    let mut editor = binding_editor(open_session(), &bindings);

    let selected = match device {
        Some(id) => {
            let id = DeviceId::new(id);
            let name = editor
                .devices()
                .iter()
                .find(|d| d.id == id)
                .map(|d| d.name.clone());
            match name {
                Some(name) => {
                    settings.input_device_id = id.clone();
                    settings.input_device_name = name;
                }
                None => {
                    log::warn!("device {id} is not attached");
                }
            }
            id
        }
        None => resolve_device(
            editor.devices(),
            &settings.input_device_id,
            &settings.input_device_name,
        ),
    };
    if selected.is_none() {
        log::warn!("no input device selected, pass --device or set input_device");
    }
    editor.select_device(selected);

    start_capture(&mut editor, action)?;

    log::info!("press a button or POV direction for {}", action.label());
    let ticker = tick(SAMPLE_INTERVAL);
    let mut shown = editor.label(action);
    log::info!("{shown}");
    while editor.is_polling() {
        select! {
            recv(stop_rx) -> _ => {
                editor.stop(action);
            }
            recv(ticker) -> _ => {
                editor.tick();
                let label = editor.label(action);
                if label != shown && editor.is_capturing(action) {
                    log::info!("{label}");
                    shown = label;
                }
            }
        }
    }

    let detection = captured(editor.take_outcome(), action)?;
    log::debug!("captured {:?} {}", detection.kind, detection.value);

    settings.input_bindings = editor.bindings();
    save_settings(&path, &settings)?;
    let binding = *settings.input_bindings.get(action);
    let yaml = serde_yaml::to_string(&BTreeMap::from([(action.key(), binding)]))?;
    log::info!("{}", yaml.trim_end());
    log::debug!("saved to {}", path.display());
    Ok(())
}

pub(crate) fn clear(dir: &ConfigDir, action: Action) -> Result<(), Error> {
    let path = dir.settings_path();
    let mut settings = load_settings(&path)?;
    let bindings = Rc::new(RefCell::new(settings.input_bindings));
    let mut editor = binding_editor(DeviceSession::offline(LogWarnings), &bindings);

    editor.clear(action);
    settings.input_bindings = editor.bindings();
    save_settings(&path, &settings)?;
    log::info!("{:<14} {}", action.label(), editor.label(action));
    Ok(())
}

pub(crate) fn run(dir: &ConfigDir) -> Result<(), Error> {
    let stop_rx = stop_channel()?;
    let settings = load_settings(&dir.settings_path())?;
    let (_watcher, settings_rx) = dir.start_watcher()?;

    let mut performer = Performer::new()?;
    let mut runner = OutputRunner::new(&mut performer);

    let mut session = open_session();
    if !session.is_available() {
        return Err(Error::InputUnavailable);
    }
    let catalog = DeviceCatalog::new();
    let mut link = DeviceLink::new(resolve_device(
        catalog.entries(&mut session),
        &settings.input_device_id,
        &settings.input_device_name,
    ));
    if link.device().is_none() {
        log::warn!("no input device configured, only settings reload is active");
    }
    let mut simulator = MouseSimulator::new(&settings);

    let ticker = tick(SAMPLE_INTERVAL);
    log::info!(
        "trucktweaksd started. Mouse simulation mode {:?}.",
        settings.mouse_simulation_mode
    );
    loop {
        select! {
            recv(stop_rx) -> _ => {
                break;
            }
            recv(settings_rx) -> msg => {
                match msg {
                    Ok(SettingsEvent::Changed(next)) => {
                        log::info!("settings reloaded");
                        simulator.apply_settings(&next);
                        let device = resolve_device(
                            catalog.entries(&mut session),
                            &next.input_device_id,
                            &next.input_device_name,
                        );
                        link.retarget(&mut session, device);
                    }
                    Ok(SettingsEvent::Removed) => {
                        log::warn!("settings file removed, keeping current settings");
                    }
                    Ok(SettingsEvent::Error(e)) => {
                        log::error!("failed to reload settings: {e}");
                    }
                    Err(err) => {
                        log::error!("settings channel closed: {err}");
                        break;
                    }
                }
            }
            recv(ticker) -> _ => {
                match link.sample(&mut session, Instant::now()) {
                    Some(state) => {
                        simulator.on_sample_with(&state, |output| runner.run(output));
                    }
                    None => {
                        simulator.release_all_with(|output| runner.run(output));
                    }
                }
            }
        }
    }

    simulator.release_all_with(|output| runner.run(output));
    log::info!("trucktweaksd stopped");
    Ok(())
}
