//! The canvas-mounted component exported to JavaScript.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use textured_quad_core::{
    render_setup, MountHook, MountState, PowerPreference, QuadConfig, QuadScene, SetupError,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext, WebGlContextAttributes, WebGlPowerPreference};

use crate::fetch::{describe, BrowserFetcher};
use crate::logger;

fn web_power_preference(pref: PowerPreference) -> WebGlPowerPreference {
    match pref {
        PowerPreference::HighPerformance => WebGlPowerPreference::HighPerformance,
        PowerPreference::LowPower => WebGlPowerPreference::LowPower,
        PowerPreference::Default => WebGlPowerPreference::Default,
    }
}

fn create_context(
    canvas: &HtmlCanvasElement,
    pref: PowerPreference,
) -> Result<glow::Context, SetupError> {
    let attrs = WebGlContextAttributes::new();
    attrs.set_power_preference(web_power_preference(pref));

    let gl = canvas
        .get_context_with_context_options("webgl2", &attrs)
        .map_err(|e| SetupError::Gl(describe(&e)))?
        .ok_or_else(|| SetupError::Gl("WebGL2 is not available".to_string()))?
        .dyn_into::<WebGl2RenderingContext>()
        .map_err(|_| SetupError::Gl("context is not a WebGL2RenderingContext".to_string()))?;

    Ok(glow::Context::from_webgl2_context(gl))
}

/// Context and objects kept alive after a successful mount.
struct Mounted {
    gl: glow::Context,
    scene: QuadScene<glow::Context>,
}

/// One textured quad bound to one canvas.
#[wasm_bindgen]
pub struct QuadComponent {
    canvas: HtmlCanvasElement,
    config: Rc<QuadConfig>,
    hook: Rc<RefCell<MountHook>>,
    mounted: Rc<RefCell<Option<Mounted>>>,
}

#[wasm_bindgen]
impl QuadComponent {
    /// Creates the component. `config_json` may be omitted or empty.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        config_json: Option<String>,
    ) -> Result<QuadComponent, JsValue> {
        let config = QuadConfig::from_json(config_json.as_deref().unwrap_or_default())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let level = config
            .level_filter()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        logger::init(level);

        Ok(Self {
            canvas,
            config: Rc::new(config),
            hook: Rc::new(RefCell::new(MountHook::new())),
            mounted: Rc::new(RefCell::new(None)),
        })
    }

    /// Render-lifecycle callback. Runs the setup on the first render only.
    ///
    /// The returned promise rejects with the error text if setup fails.
    #[wasm_bindgen(js_name = onAfterRender)]
    pub fn on_after_render(&self, first_render: bool) -> Promise {
        if !self.hook.borrow_mut().begin(first_render) {
            return Promise::resolve(&JsValue::UNDEFINED);
        }

        let canvas = self.canvas.clone();
        let config = Rc::clone(&self.config);
        let hook = Rc::clone(&self.hook);
        let mounted = Rc::clone(&self.mounted);

        future_to_promise(async move {
            let result = mount(&canvas, &config).await;
            hook.borrow_mut().finish(&result);
            match result {
                Ok(m) => {
                    *mounted.borrow_mut() = Some(m);
                    Ok(JsValue::UNDEFINED)
                }
                Err(e) => {
                    log::error!("quad setup failed: {e}");
                    Err(JsValue::from_str(&e.to_string()))
                }
            }
        })
    }

    /// Releases GPU objects. The component will not set up again.
    pub fn dispose(&self) {
        if let Some(m) = self.mounted.borrow_mut().take() {
            m.scene.destroy(&m.gl);
        }
    }

    /// `pending`, `running`, `done` or `failed: <message>`.
    pub fn state(&self) -> String {
        match self.hook.borrow().state() {
            MountState::Pending => "pending".to_string(),
            MountState::Running => "running".to_string(),
            MountState::Done => "done".to_string(),
            MountState::Failed(msg) => format!("failed: {msg}"),
        }
    }
}

async fn mount(canvas: &HtmlCanvasElement, config: &QuadConfig) -> Result<Mounted, SetupError> {
    let gl = create_context(canvas, config.power_preference)?;
    log::debug!(
        "created WebGL2 context ({})",
        config.power_preference.as_str()
    );
    let scene = render_setup(&gl, &BrowserFetcher, config).await?;
    Ok(Mounted { gl, scene })
}
