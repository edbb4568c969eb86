//! Scripted session against a headless host: open the sheet, drag it a little and
//! let it snap back, drag it away, reopen it and dismiss it with a backdrop tap.
//!
//! `cargo run -p sample -- [config.json]`

use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use semimodal::{SemiModalConfig, SemiModalPresenter, SemiModalScreen, SemiModalSizing};
use semimodal_core::animation::{Clock, TestClock};
use semimodal_core::*;
use semimodal_platform::ModalHost;

const SCREEN: Size = Size {
    width: 390.0,
    height: 844.0,
};

struct MainScreen {
    view: ViewId,
    button: ViewId,
}

impl MainScreen {
    fn new(tree: &mut ViewTree) -> Result<Self, ViewError> {
        let view = tree.create(ViewKind::Plain);
        let button = tree.create_with_frame(ViewKind::Plain, Rect::new(145.0, 400.0, 100.0, 44.0));
        if let Some(node) = tree.get_mut(button) {
            node.background = Color::from_rgb(0, 122, 255);
            node.corner_radius = 8.0;
        }
        tree.add_subview(view, button)?;
        Ok(Self { view, button })
    }
}

/// A sheet that sizes itself to its content.
struct ModalScreen {
    view: ViewId,
    content: ViewId,
}

impl ModalScreen {
    fn new(tree: &mut ViewTree) -> Result<Self, ViewError> {
        let view = tree.create(ViewKind::Plain);
        if let Some(node) = tree.get_mut(view) {
            node.background = Color::WHITE;
        }
        let content = tree.create_with_frame(ViewKind::Scroll, Rect::new(0.0, 0.0, SCREEN.width, 300.0));
        tree.add_subview(view, content)?;
        Ok(Self { view, content })
    }
}

impl SemiModalSizing for ModalScreen {
    fn semi_modal_content_height(&self, tree: &ViewTree) -> f32 {
        tree.frame(self.content).map(|f| f.h).unwrap_or_default()
    }
}

impl SemiModalScreen for ModalScreen {
    fn view(&self) -> ViewId {
        self.view
    }

    fn sizing(&self) -> Option<&dyn SemiModalSizing> {
        Some(self)
    }
}

struct OpenButton {
    presenter: Rc<SemiModalPresenter>,
    presenting: ViewId,
}

impl GestureTarget for OpenButton {
    fn on_tap(&self, _view: ViewId, host: &mut dyn HostContext) {
        log::info!("button tapped");
        self.presenter.present_over(self.presenting, host);
    }
}

struct Session {
    host: ModalHost,
    clock: TestClock,
}

impl Session {
    fn pointer(&mut self, event: PointerEventKind, x: f32, y: f32) {
        let time = self.clock.now();
        self.host.send_pointer(PointerEvent {
            id: PointerId(1),
            event,
            position: Vec2::new(x, y),
            time,
        });
        self.clock.advance(Duration::from_millis(16));
        self.host.tick();
    }

    fn tap(&mut self, x: f32, y: f32) {
        self.pointer(PointerEventKind::Down, x, y);
        self.pointer(PointerEventKind::Up, x, y);
    }

    fn drag(&mut self, x: f32, from_y: f32, to_y: f32) {
        self.pointer(PointerEventKind::Down, x, from_y);
        let steps = 6;
        for i in 1..=steps {
            let y = from_y + (to_y - from_y) * i as f32 / steps as f32;
            self.pointer(PointerEventKind::Move, x, y);
        }
        self.pointer(PointerEventKind::Up, x, to_y);
    }

    fn settle(&mut self) {
        while self.host.is_transitioning() {
            self.clock.advance(Duration::from_millis(16));
            self.host.tick();
        }
    }
}

fn load_config() -> anyhow::Result<SemiModalConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config from {path}"))?;
            let config = SemiModalConfig::from_json(&json)
                .with_context(|| format!("parsing config from {path}"))?;
            log::info!("loaded config from {path}");
            Ok(config)
        }
        None => Ok(SemiModalConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = load_config()?;

    let clock = TestClock::new(web_time::Instant::now());
    let mut host = ModalHost::with_clock(SCREEN, Rc::new(clock.clone()));
    let main_screen = MainScreen::new(host.tree_mut())?;
    host.set_root(main_screen.view)?;

    let modal: Rc<ModalScreen> = Rc::new(ModalScreen::new(host.tree_mut())?);
    let presenter = SemiModalPresenter::with_config(config);
    presenter.set_screen(modal.clone(), &mut host);

    let button_target = Rc::new(OpenButton {
        presenter: presenter.clone(),
        presenting: main_screen.view,
    });
    host.tree_mut()
        .add_recognizer(main_screen.button, Recognizer::tap(button_target))?;

    let controller = presenter.controller();
    controller
        .state_signal()
        .subscribe(|s| log::info!("dismiss state: {s:?}"));
    controller
        .progress_signal()
        .subscribe(|p| log::debug!("dismiss progress: {p:.2}"));

    let mut session = Session { host, clock };
    let button = session
        .host
        .tree()
        .window_frame(main_screen.button)
        .context("button is not in the tree")?
        .center();

    session.tap(button.x, button.y);
    session.settle();
    let sheet = session
        .host
        .tree()
        .window_frame(modal.view)
        .context("sheet was not presented")?;
    log::info!("sheet presented at {sheet:?}");

    let grab = sheet.y + 100.0;
    session.drag(sheet.center().x, grab, grab + 60.0);
    session.settle();
    log::info!(
        "short drag released, still presented: {}",
        session.host.is_presented(modal.view)
    );

    session.drag(sheet.center().x, grab, grab + 200.0);
    session.settle();
    log::info!(
        "long drag released, still presented: {}",
        session.host.is_presented(modal.view)
    );

    session.tap(button.x, button.y);
    session.settle();
    // backdrop above the sheet
    session.tap(SCREEN.width / 2.0, 100.0);
    session.settle();
    log::info!(
        "backdrop tapped, still presented: {}",
        session.host.is_presented(modal.view)
    );

    Ok(())
}
