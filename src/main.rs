//! Epidemic Billiards entry point
//!
//! On the web: reads the form, runs the animation loop and renders with
//! WebGPU. Natively: runs the simulation headless and prints frame counts.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, Window};

    use epidemic_billiards::consts::*;
    use epidemic_billiards::renderer::{RenderState, SurfaceRecovery, build_scene};
    use epidemic_billiards::sim::{Arena, FrameSummary, SimulationState, TickInput, tick};
    use epidemic_billiards::{History, Result, Settings};

    /// App instance holding all state
    struct App {
        state: SimulationState,
        history: History,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        last_time: f64,
        running: bool,
        /// Touch devices keep the size the page loaded with, so the soft
        /// keyboard does not shrink the arena
        follow_window: bool,
        initial_size: (f64, f64),
        last_summary: FrameSummary,
    }

    impl App {
        fn new(
            settings: &Settings,
            canvas: HtmlCanvasElement,
            follow_window: bool,
        ) -> Result<Self> {
            let initial_size = window_size();
            let arena = measure_arena(follow_window, initial_size);
            let state = SimulationState::new(settings, arena)?;
            Ok(Self {
                state,
                history: History::default(),
                render_state: None,
                canvas,
                last_time: 0.0,
                running: true,
                follow_window,
                initial_size,
                last_summary: FrameSummary::default(),
            })
        }

        /// Re-read the form and start over
        fn restart(&mut self) -> Result<()> {
            let mut settings = Settings::load();
            if let Some(document) = document() {
                settings.apply_form(&document);
            }
            let arena = measure_arena(self.follow_window, self.initial_size);
            self.state = SimulationState::new(&settings, arena)?;
            settings.save();
            self.history.clear();
            self.running = true;
            log::info!("Simulation restarted with seed {}", self.state.seed);
            Ok(())
        }

        /// Advance one frame; `dt_ms` is the measured frame delta
        fn update(&mut self, dt_ms: f64) {
            let dt = (dt_ms / 1000.0) as f32;
            if !dt.is_finite() || dt.abs() >= MAX_FRAME_DT {
                log::warn!("Skipping frame with delta {:.0} ms", dt_ms);
                return;
            }
            if dt <= 0.0 {
                return;
            }

            let arena = measure_arena(self.follow_window, self.initial_size);
            self.resize_canvas(arena);
            let input = TickInput { arena: Some(arena) };
            let summary = tick(&mut self.state, &input, dt);
            self.history.record(summary);
            self.last_summary = summary;
        }

        fn resize_canvas(&mut self, arena: Arena) {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let width = (arena.width as f64 * dpr) as u32;
            let height = (arena.height as f64 * dpr) as u32;
            if self.canvas.width() != width || self.canvas.height() != height {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                let style = self.canvas.style();
                let _ = style.set_property("width", &format!("{}px", arena.width));
                let _ = style.set_property("height", &format!("{}px", arena.height));
            }
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(&self.state, &self.history);
            let arena = self.state.arena();
            let view = glam::Vec2::new(arena.width, arena.height);
            if let Some(ref mut render_state) = self.render_state {
                if let Err(e) = render_state.render(&vertices, view) {
                    match SurfaceRecovery::for_error(&e) {
                        SurfaceRecovery::Reconfigure => {
                            log::warn!("Surface {:?}, reconfiguring", e);
                            render_state.reconfigure();
                        }
                        SurfaceRecovery::Fatal => log::error!("Out of memory!"),
                        SurfaceRecovery::Skip => log::warn!("Render error: {:?}", e),
                    }
                }
            }
        }

        /// Write the counts into the page's output elements
        fn update_outputs(&self) {
            let Some(document) = document() else {
                return;
            };
            let s = &self.last_summary;
            for (id, value) in [
                ("uninfected", s.susceptible),
                ("infected", s.infected),
                ("recovered", s.recovered),
                ("deaths", s.deceased),
            ] {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(&value.to_string()));
                }
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn window_size() -> (f64, f64) {
        let Some(window) = web_sys::window() else {
            return (DEFAULT_ARENA_WIDTH as f64, DEFAULT_ARENA_HEIGHT as f64);
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64());
        let h = window.inner_height().ok().and_then(|v| v.as_f64());
        (
            w.unwrap_or(DEFAULT_ARENA_WIDTH as f64),
            h.unwrap_or(DEFAULT_ARENA_HEIGHT as f64),
        )
    }

    /// Arena from the window (or the load-time size) and the panel element,
    /// keeping the panel pinned to the top-right corner
    fn measure_arena(follow_window: bool, initial_size: (f64, f64)) -> Arena {
        let (width, height) = if follow_window {
            window_size()
        } else {
            initial_size
        };

        let panel: Option<HtmlElement> = document()
            .and_then(|d| d.get_element_by_id("panel"))
            .and_then(|el| el.dyn_into().ok());
        let (cut_w, cut_h) = match &panel {
            Some(panel) => (panel.client_width() as f32, panel.client_height() as f32),
            None => (DEFAULT_PANEL_WIDTH, DEFAULT_PANEL_HEIGHT),
        };
        if let Some(panel) = panel {
            let style = panel.style();
            let _ = style.set_property("top", "0px");
            let _ = style.set_property("left", &format!("{}px", width as f32 - cut_w));
        }

        Arena::new(width as f32, height as f32, cut_w, cut_h)
    }

    fn is_touch_device(window: &Window) -> bool {
        let has_touch_events =
            js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
        has_touch_events || window.navigator().max_touch_points() > 0
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Epidemic Billiards starting...");

        if let Err(e) = start().await {
            log::error!("Startup failed: {e}");
        }
    }

    async fn start() -> Result<()> {
        use epidemic_billiards::Error;

        let window = web_sys::window().ok_or_else(|| Error::Renderer("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| Error::Renderer("no document".into()))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvasBilliard")
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| Error::Renderer("no #canvasBilliard canvas".into()))?;

        // Show the last run's values, then take whatever the form holds
        let stored = Settings::stored();
        if let Some(stored) = &stored {
            stored.fill_form(&document);
        }
        let mut settings = stored.unwrap_or_default();
        settings.apply_form(&document);

        let follow_window = !is_touch_device(&window);
        let app = App::new(&settings, canvas.clone(), follow_window)?;
        let app = Rc::new(RefCell::new(app));
        settings.save();
        let arena = app.borrow().state.arena();
        app.borrow_mut().resize_canvas(arena);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| Error::Renderer(format!("failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::Renderer(format!("failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            RenderState::new(surface, &adapter, canvas.width(), canvas.height()).await?;
        app.borrow_mut().render_state = Some(render_state);

        setup_controls(app.clone());
        setup_orientation_reload(&window);

        request_animation_frame(app);

        log::info!("Epidemic Billiards running!");
        Ok(())
    }

    fn setup_controls(app: Rc<RefCell<App>>) {
        let Some(document) = document() else {
            return;
        };

        // Stop: keep rendering, stop stepping
        if let Some(btn) = document.get_element_by_id("stop-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().running = false;
                log::info!("Simulation stopped");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().running = true;
                log::info!("Simulation resumed");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                if let Err(e) = app.borrow_mut().restart() {
                    log::error!("Restart failed: {e}");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// A rotated device gets a fresh page with the new size
    fn setup_orientation_reload(window: &Window) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        });
        let _ = window.add_event_listener_with_callback(
            "orientationchange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            app_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn app_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt_ms = if a.last_time > 0.0 {
                time - a.last_time
            } else {
                0.0
            };
            a.last_time = time;

            if a.running {
                a.update(dt_ms);
            }
            a.render();
            a.update_outputs();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use epidemic_billiards::sim::{Arena, SimulationState, TickInput, tick};
    use epidemic_billiards::{History, Result, Settings};

    /// Fixed step for headless runs (60 Hz)
    const STEP: f32 = 1.0 / 60.0;

    /// `epidemic-billiards [settings.json] [seconds]`
    pub fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::from_json(&std::fs::read_to_string(path)?)?,
            None => Settings::default(),
        };
        let seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);

        let mut state = SimulationState::new(&settings, Arena::default())?;
        let mut history = History::new(1);
        let input = TickInput::default();
        let steps_per_report = (1.0 / STEP).round() as u64;

        while state.time() < seconds {
            let summary = tick(&mut state, &input, STEP);
            history.record(summary);
            if state.frame() % steps_per_report == 0 {
                println!("{}", serde_json::to_string(&summary)?);
            }
            // The epidemic is over once nobody is infected
            if summary.infected == 0 {
                break;
            }
        }

        if let Some(last) = history.latest() {
            log::info!(
                "Finished at t = {:.1}s: {} susceptible, {} recovered, {} deceased",
                last.time,
                last.susceptible,
                last.recovered,
                last.deceased
            );
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Epidemic Billiards (native, headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
