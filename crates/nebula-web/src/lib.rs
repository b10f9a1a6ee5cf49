//! Browser host for nebula.
//!
//! Binds a [`Renderer`] to an HTML `<canvas>`, drives it from
//! `requestAnimationFrame` and feeds it window `mousemove` events. Built with
//! `wasm-pack build --target web`; the page calls [`start`] once after
//! loading the module, or [`start_background`] and [`start_clock`] to mount
//! a single canvas.

mod paint;

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveTime;
use nebula_background::{Clock, Renderer, RendererSettings, SettingsError, normalize};
use nebula_config::Config;
use nebula_core::{RenderCommand, Surface, Variant};
use wasm_bindgen::{JsCast, closure::Closure, prelude::*};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

pub use paint::{line_cap, replay};

/// Local time of day from the browser's `Date`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now(&self) -> NaiveTime {
        let date = js_sys::Date::new_0();
        NaiveTime::from_hms_milli_opt(
            date.get_hours(),
            date.get_minutes(),
            date.get_seconds(),
            date.get_milliseconds(),
        )
        .unwrap_or(NaiveTime::MIN)
    }
}

/// Start both renderers from a TOML configuration document (the same format
/// as the terminal's `config.toml`). Canvas ids come from its `[web]` table.
#[wasm_bindgen]
pub fn start(config_toml: Option<String>) -> Result<(), JsValue> {
    let config = parse_config(config_toml.as_deref()).map_err(to_js)?;
    let settings = config.renderer_settings();
    mount(&config.web.background_canvas, Variant::Starfield, settings.clone());
    mount(&config.web.clock_canvas, Variant::Clock, settings);
    Ok(())
}

/// Start the starfield on `canvas_id` (default `bg-canvas`).
///
/// `settings_json` optionally overrides renderer settings, e.g.
/// `{"starfield": {"per_layer": 60}}`. A missing canvas or 2D context leaves
/// the page untouched.
#[wasm_bindgen]
pub fn start_background(
    canvas_id: Option<String>,
    settings_json: Option<String>,
) -> Result<(), JsValue> {
    let settings = parse_settings(settings_json.as_deref()).map_err(to_js)?;
    let default_id = Config::default().web.background_canvas;
    mount(
        canvas_id.as_deref().unwrap_or(&default_id),
        Variant::Starfield,
        settings,
    );
    Ok(())
}

/// Start the ring clock on `canvas_id` (default `clock3d`).
#[wasm_bindgen]
pub fn start_clock(
    canvas_id: Option<String>,
    settings_json: Option<String>,
) -> Result<(), JsValue> {
    let settings = parse_settings(settings_json.as_deref()).map_err(to_js)?;
    let default_id = Config::default().web.clock_canvas;
    mount(
        canvas_id.as_deref().unwrap_or(&default_id),
        Variant::Clock,
        settings,
    );
    Ok(())
}

/// Render one frame off-screen and return its commands as JSON.
///
/// `variant` is `"starfield"` or `"clock"`; `millis` is the time of day in
/// milliseconds since midnight.
#[wasm_bindgen]
pub fn render_commands_json(
    variant: &str,
    width: f64,
    height: f64,
    device_scale: f64,
    seed: u64,
    millis: u32,
) -> Result<String, JsValue> {
    frame_json(variant, width, height, device_scale, seed, millis).map_err(to_js)
}

/// Caller-supplied settings that cannot be used.
#[derive(Debug, thiserror::Error)]
enum SettingsInputError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] SettingsError),
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_config(toml: Option<&str>) -> Result<Config, nebula_config::ConfigError> {
    match toml {
        Some(toml) => Config::from_toml_str(toml),
        None => Ok(Config::default()),
    }
}

fn parse_settings(json: Option<&str>) -> Result<RendererSettings, SettingsInputError> {
    let settings = match json {
        Some(json) if !json.trim().is_empty() => serde_json::from_str(json)?,
        _ => RendererSettings::default(),
    };
    settings.validate()?;
    Ok(settings)
}

fn parse_variant(name: &str) -> serde_json::Result<Variant> {
    serde_json::from_value(serde_json::Value::String(name.to_ascii_lowercase()))
}

fn frame_json(
    variant: &str,
    width: f64,
    height: f64,
    device_scale: f64,
    seed: u64,
    millis: u32,
) -> serde_json::Result<String> {
    let variant = parse_variant(variant)?;
    let mut renderer = Renderer::new(variant, RendererSettings::default(), seed);
    renderer.initialize(Some(Surface::new(width, height, device_scale)));
    let commands: Vec<RenderCommand> = renderer.render_frame(time_of_day(millis));
    serde_json::to_string(&commands)
}

/// Milliseconds since midnight as a time of day, wrapping past 24h.
fn time_of_day(millis: u32) -> NaiveTime {
    let millis = millis % 86_400_000;
    NaiveTime::from_num_seconds_from_midnight_opt(millis / 1000, (millis % 1000) * 1_000_000)
        .unwrap_or(NaiveTime::MIN)
}

/// A renderer bound to a canvas.
struct Host {
    renderer: Renderer,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Host {
    /// Re-measure the canvas, resize its backing store if the layout
    /// changed, then paint one frame.
    fn frame(&mut self, window: &Window) {
        let width = self.canvas.client_width() as f64;
        let height = self.canvas.client_height() as f64;
        let resized = self
            .renderer
            .sync_surface(width, height, window.device_pixel_ratio());
        if let (true, Some(surface)) = (resized, self.renderer.surface()) {
            let (bw, bh) = surface.backing_size();
            self.canvas.set_width(bw);
            self.canvas.set_height(bh);
        }
        let commands = self.renderer.tick(&BrowserClock);
        paint::replay(&self.ctx, &commands);
    }
}

fn lookup(
    window: &Window,
    canvas_id: &str,
) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
    let canvas = window
        .document()?
        .get_element_by_id(canvas_id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    let ctx = canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    Some((canvas, ctx))
}

fn mount(canvas_id: &str, variant: Variant, settings: RendererSettings) {
    console_error_panic_hook_setup();

    let seed = js_sys::Date::now() as u64;
    let mut renderer = Renderer::new(variant, settings, seed);
    let Some(window) = web_sys::window() else {
        renderer.initialize(None);
        return;
    };
    let Some((canvas, ctx)) = lookup(&window, canvas_id) else {
        log::debug!("no 2d canvas #{canvas_id}; {variant:?} renderer disabled");
        renderer.initialize(None);
        return;
    };

    let host = Rc::new(RefCell::new(Host {
        renderer,
        canvas,
        ctx,
    }));
    if variant == Variant::Starfield {
        listen_pointer(&window, &host);
    }
    run_frames(window, host);
}

fn listen_pointer(window: &Window, host: &Rc<RefCell<Host>>) {
    let host = Rc::clone(host);
    let win = window.clone();
    let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
        let vw = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let vh = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let (nx, ny) = normalize(event.client_x() as f64, event.client_y() as f64, vw, vh);
        host.borrow_mut().renderer.on_pointer_move(nx, ny);
    }) as Box<dyn FnMut(MouseEvent)>);
    let _ =
        window.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref());
    on_move.forget();
}

/// Self-rescheduling `requestAnimationFrame` loop. It runs for the life of
/// the page.
fn run_frames(window: Window, host: Rc<RefCell<Host>>) {
    let holder: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&holder);
    let win = window.clone();
    *holder.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        host.borrow_mut().frame(&win);
        if let Some(cb) = next.borrow().as_ref() {
            let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));

    if let Some(cb) = holder.borrow().as_ref() {
        let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("nebula panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_time_of_day() {
        let t = time_of_day((3 * 3600 + 15 * 60 + 30) * 1000 + 250);
        assert_eq!(t, NaiveTime::from_hms_milli_opt(3, 15, 30, 250).unwrap());
        assert_eq!(time_of_day(86_400_000), NaiveTime::MIN);
    }

    #[test]
    fn test_parse_settings() {
        assert_eq!(parse_settings(None).unwrap(), RendererSettings::default());
        assert_eq!(parse_settings(Some("  ")).unwrap(), RendererSettings::default());
        let s = parse_settings(Some(r#"{"starfield": {"per_layer": 10}}"#)).unwrap();
        assert_eq!(s.starfield.per_layer, 10);
        assert_eq!(s.starfield.layers, 3);
        assert!(matches!(parse_settings(Some("{")), Err(SettingsInputError::Json(_))));
    }

    #[test]
    fn test_out_of_range_settings_are_rejected() {
        let err = parse_settings(Some(r#"{"starfield": {"speed": -5.0}}"#)).unwrap_err();
        assert!(matches!(
            err,
            SettingsInputError::Invalid(SettingsError {
                field: "starfield.speed",
                ..
            })
        ));
        let err = parse_settings(Some(r#"{"starfield": {"per_layer": 100000000}}"#)).unwrap_err();
        assert!(err.to_string().contains("starfield.per_layer"));
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(Some("[web]\nclock_canvas = \"face\"\n")).unwrap();
        assert_eq!(config.web.clock_canvas, "face");
        assert_eq!(config.web.background_canvas, "bg-canvas");
        assert!(parse_config(Some("[starfield]\nlayers = 0\n")).is_err());
        assert_eq!(parse_config(None).unwrap(), Config::default());
    }

    #[test]
    fn test_parse_variant() {
        assert_eq!(parse_variant("Clock").unwrap(), Variant::Clock);
        assert_eq!(parse_variant("starfield").unwrap(), Variant::Starfield);
        assert!(parse_variant("matrix").is_err());
    }

    #[test]
    fn test_frame_json_round_trips() {
        let json = frame_json("clock", 200.0, 200.0, 2.0, 1, 0).unwrap();
        let commands: Vec<RenderCommand> = serde_json::from_str(&json).unwrap();
        assert_eq!(commands[0], RenderCommand::SetTransform { scale: 2.0 });
        // transform + clear + shadow + 6 arcs + cap
        assert_eq!(commands.len(), 10);
    }

    #[test]
    fn test_frame_json_is_seeded() {
        let a = frame_json("starfield", 320.0, 240.0, 1.0, 5, 0).unwrap();
        let b = frame_json("starfield", 320.0, 240.0, 1.0, 5, 0).unwrap();
        assert_eq!(a, b);
    }
}
