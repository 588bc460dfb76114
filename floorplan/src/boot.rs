//! Browser bootstrap: finds the page's elements and wires them to the engine.
//!
//! Every element is optional. A missing canvas disables the whole sketchpad;
//! a missing button or panel disables only that control.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, EventTarget, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    HtmlSelectElement, MouseEvent, Window,
};

use crate::engine::{Action, Engine, EngineConfig};
use crate::frame_loop;
use crate::snapshot::{MetricField, Metrics, SceneSnapshot, SuggestionResponse, suggestion_lines};
use crate::template::RoomTemplate;
use crate::viewport::Point;

const CANVAS_ID: &str = "simulationCanvas";
const AC_TEMP_ID: &str = "acTemp";
const AC_TEMP_LABEL_ID: &str = "acTempLabel";
const ROOM_TEMPLATE_ID: &str = "roomTemplate";
const SUGGEST_BUTTON_ID: &str = "getSuggestionBtn";
const SUGGEST_BLOCK_ID: &str = "aiSuggestions";
const SUGGEST_LIST_ID: &str = "suggestionText";

const SUGGEST_ENDPOINT: &str = "/api/suggestions";
const SUGGEST_PENDING_LABEL: &str = "🤖 產生中…";

/// `(button id, preset key, is device)`.
const ADD_BUTTONS: [(&str, &str, bool); 8] = [
    ("addSofaBtn", "sofa", false),
    ("addTableBtn", "table", false),
    ("addBedBtn", "bed", false),
    ("addDeskBtn", "desk", false),
    ("addTvBtn", "tv", false),
    ("addOtherBtn", "other", false),
    ("addFanBtn", "fan", true),
    ("addAcBtn", "ac", true),
];

const METRIC_CLASSES: [&str; 3] = ["metric-low", "metric-mid", "metric-high"];

type SharedEngine = Rc<RefCell<Engine>>;
type PointerHandler = fn(&mut Engine, Point, Point) -> Vec<Action>;

#[wasm_bindgen(start)]
pub fn boot() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        log::debug!("logger already installed: {e}");
    }

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        log::warn!("no document; sketchpad disabled");
        return;
    };
    let Some(canvas) = element::<HtmlCanvasElement>(&document, CANVAS_ID) else {
        log::warn!("#{CANVAS_ID} not found; sketchpad disabled");
        return;
    };
    let engine = match Engine::new(canvas.clone(), EngineConfig::default()) {
        Ok(engine) => Rc::new(RefCell::new(engine)),
        Err(e) => {
            log::warn!("sketchpad disabled: {e}");
            return;
        }
    };

    sync_viewport(&window, &canvas, &engine);
    {
        let window_for_cb = window.clone();
        let canvas = canvas.clone();
        let engine = Rc::clone(&engine);
        listen(&window, "resize", move |_| sync_viewport(&window_for_cb, &canvas, &engine));
    }

    wire_pointer(&window, &canvas, &engine);
    wire_add_buttons(&document, &engine);
    wire_settings(&document, &engine);
    wire_suggestions(&document, &engine);

    let handle = frame_loop::start(Rc::clone(&engine));
    listen(&window, "pagehide", move |_| {
        if handle.is_running() {
            handle.stop();
        } else {
            log::debug!("frame loop already stopped");
        }
    });
}

fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    let el = document.get_element_by_id(id)?;
    match el.dyn_into::<T>() {
        Ok(el) => Some(el),
        Err(_) => {
            log::warn!("#{id} is not the expected element type");
            None
        }
    }
}

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    if let Err(e) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        log::warn!("failed to listen for {event}: {e:?}");
        return;
    }
    // Listeners live as long as the page.
    cb.forget();
}

// =============================================================
// Canvas
// =============================================================

fn sync_viewport(window: &Window, canvas: &HtmlCanvasElement, engine: &SharedEngine) {
    let rect = canvas.get_bounding_client_rect();
    let dpr = window.device_pixel_ratio();
    if let Ok(mut engine) = engine.try_borrow_mut() {
        engine.set_viewport(rect.width(), rect.height(), dpr);
    }
}

fn wire_pointer(window: &Window, canvas: &HtmlCanvasElement, engine: &SharedEngine) {
    let bindings: [(&EventTarget, &str, PointerHandler); 3] = [
        (canvas, "mousedown", Engine::on_pointer_down),
        (canvas, "mousemove", Engine::on_pointer_move),
        // Release anywhere on the page ends the session.
        (window, "mouseup", Engine::on_pointer_up),
    ];
    for (target, event, handler) in bindings {
        let canvas = canvas.clone();
        let engine = Rc::clone(engine);
        listen(target, event, move |ev| {
            if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
                dispatch_pointer(&canvas, &engine, ev, handler);
            }
        });
    }
}

fn dispatch_pointer(canvas: &HtmlCanvasElement, engine: &SharedEngine, ev: &MouseEvent, handler: PointerHandler) {
    let rect = canvas.get_bounding_client_rect();
    let origin = Point::new(rect.left(), rect.top());
    let client = Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()));
    let actions = match engine.try_borrow_mut() {
        Ok(mut engine) => handler(&mut engine, client, origin),
        Err(_) => return,
    };
    for action in actions {
        if let Action::SetCursor(cursor) = action {
            if let Err(e) = canvas.style().set_property("cursor", &cursor) {
                log::debug!("cursor update failed: {e:?}");
            }
        }
    }
}

// =============================================================
// Controls
// =============================================================

fn wire_add_buttons(document: &Document, engine: &SharedEngine) {
    for (id, key, is_device) in ADD_BUTTONS {
        let Some(button) = document.get_element_by_id(id) else {
            log::debug!("#{id} not found");
            continue;
        };
        let engine = Rc::clone(engine);
        listen(&button, "click", move |_| {
            if let Ok(mut engine) = engine.try_borrow_mut() {
                if is_device {
                    engine.add_device(key);
                } else {
                    engine.add_furniture(key);
                }
            }
        });
    }
}

fn wire_settings(document: &Document, engine: &SharedEngine) {
    if let Some(input) = element::<HtmlInputElement>(document, AC_TEMP_ID) {
        apply_ac_temp(document, &input, engine);
        let document = document.clone();
        let engine = Rc::clone(engine);
        let target = input.clone();
        listen(&target, "input", move |_| apply_ac_temp(&document, &input, &engine));
    }

    if let Some(select) = element::<HtmlSelectElement>(document, ROOM_TEMPLATE_ID) {
        let engine = Rc::clone(engine);
        let target = select.clone();
        listen(&target, "change", move |_| match select.value().parse::<RoomTemplate>() {
            Ok(template) => {
                if let Ok(mut engine) = engine.try_borrow_mut() {
                    engine.load_template(template);
                }
            }
            Err(e) => log::warn!("{e}"),
        });
    }
}

fn apply_ac_temp(document: &Document, input: &HtmlInputElement, engine: &SharedEngine) {
    let Ok(celsius) = input.value().parse::<f64>() else {
        log::debug!("ignoring non-numeric AC temperature {:?}", input.value());
        return;
    };
    if let Ok(mut engine) = engine.try_borrow_mut() {
        engine.set_ac_temp(celsius);
    }
    if let Some(label) = document.get_element_by_id(AC_TEMP_LABEL_ID) {
        label.set_text_content(Some(&format!("{celsius}°C")));
    }
}

// =============================================================
// Suggestions
// =============================================================

fn wire_suggestions(document: &Document, engine: &SharedEngine) {
    let (Some(button), Some(block), Some(list)) = (
        element::<HtmlButtonElement>(document, SUGGEST_BUTTON_ID),
        document.get_element_by_id(SUGGEST_BLOCK_ID),
        document.get_element_by_id(SUGGEST_LIST_ID),
    ) else {
        log::debug!("suggestion panel not found");
        return;
    };

    let document = document.clone();
    let engine = Rc::clone(engine);
    let target = button.clone();
    listen(&target, "click", move |_| {
        let snapshot = match engine.try_borrow() {
            Ok(engine) => engine.snapshot(),
            Err(_) => return,
        };
        let document = document.clone();
        let button = button.clone();
        let block = block.clone();
        let list = list.clone();
        wasm_bindgen_futures::spawn_local(async move {
            button.set_disabled(true);
            let label = button.text_content();
            button.set_text_content(Some(SUGGEST_PENDING_LABEL));

            let result = request_suggestions(&snapshot).await;
            if let Err(e) = &result {
                log::warn!("suggestion request failed: {e}");
            }
            show_lines(&document, &list, &suggestion_lines(&result));
            if let Ok(SuggestionResponse { metrics: Some(metrics), .. }) = &result {
                show_metrics(&document, metrics);
            }
            if let Err(e) = block.class_list().remove_1("hidden") {
                log::debug!("could not reveal suggestions: {e:?}");
            }

            button.set_disabled(false);
            button.set_text_content(label.as_deref());
        });
    });
}

async fn request_suggestions(snapshot: &SceneSnapshot) -> Result<SuggestionResponse, String> {
    let resp = gloo_net::http::Request::post(SUGGEST_ENDPOINT)
        .json(snapshot)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let status = resp.status();
    if !(200..300).contains(&status) {
        return Err(format!("API 失敗 ({status})"));
    }
    resp.json::<SuggestionResponse>().await.map_err(|e| e.to_string())
}

fn show_lines(document: &Document, list: &Element, lines: &[String]) {
    list.set_inner_html("");
    for line in lines {
        match document.create_element("li") {
            Ok(li) => {
                li.set_text_content(Some(line));
                if let Err(e) = list.append_child(&li) {
                    log::debug!("could not append suggestion: {e:?}");
                }
            }
            Err(e) => log::debug!("could not create suggestion item: {e:?}"),
        }
    }
}

fn show_metrics(document: &Document, metrics: &Metrics) {
    for readout in metrics.readouts() {
        let id = match readout.field {
            MetricField::Comfort => "comfortMetric",
            MetricField::Energy => "energyMetric",
            MetricField::Airflow => "airflowMetric",
            MetricField::RecommendedTemp => "recommendedTemp",
        };
        let Some(el) = element::<HtmlElement>(document, id) else {
            continue;
        };
        el.set_inner_text(&readout.text);
        if let Some(level) = readout.level {
            let classes = el.class_list();
            let updated = METRIC_CLASSES
                .iter()
                .try_for_each(|c| classes.remove_1(c))
                .and_then(|()| classes.add_1(level.css_class()));
            if let Err(e) = updated {
                log::debug!("could not color #{id}: {e:?}");
            }
        }
    }
}
