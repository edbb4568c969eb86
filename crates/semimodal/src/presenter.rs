use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};

use semimodal_core::*;

use crate::{
    DismissAnimator, IndicatorView, InteractiveDismissController, OverlayView,
    PresentationLayoutController, SemiModalConfig,
};

/// Lets a screen choose its own sheet height.
pub trait SemiModalSizing {
    fn semi_modal_content_height(&self, tree: &ViewTree) -> f32;
}

/// A screen that can be shown as a sheet.
pub trait SemiModalScreen {
    /// Root view of the screen.
    fn view(&self) -> ViewId;

    fn sizing(&self) -> Option<&dyn SemiModalSizing> {
        None
    }
}

/// Entry point: binds a screen and acts as its transitioning delegate.
///
/// The presenter owns the overlay, the indicator and the interactive controller.
/// It only keeps a weak reference to the screen, so the caller must keep the
/// screen alive for as long as it should stay presentable.
pub struct SemiModalPresenter {
    this: Weak<SemiModalPresenter>,
    config: SemiModalConfig,
    screen: RefCell<Option<Weak<dyn SemiModalScreen>>>,
    overlay: OnceCell<Rc<OverlayView>>,
    indicator: OnceCell<Rc<IndicatorView>>,
    controller: Rc<InteractiveDismissController>,
}

impl SemiModalPresenter {
    pub fn new() -> Rc<Self> {
        Self::with_config(SemiModalConfig::default())
    }

    pub fn with_config(config: SemiModalConfig) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            controller: Rc::new(InteractiveDismissController::new(config.completion_threshold)),
            config,
            screen: RefCell::new(None),
            overlay: OnceCell::new(),
            indicator: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &SemiModalConfig {
        &self.config
    }

    pub fn screen(&self) -> Option<Rc<dyn SemiModalScreen>> {
        self.screen.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub fn controller(&self) -> &Rc<InteractiveDismissController> {
        &self.controller
    }

    /// Created by the first `set_screen`.
    pub fn overlay(&self) -> Option<&Rc<OverlayView>> {
        self.overlay.get()
    }

    pub fn indicator(&self) -> Option<&Rc<IndicatorView>> {
        self.indicator.get()
    }

    /// Binds `screen`: registers this presenter as its custom transition delegate
    /// and wires the dismiss gestures. Replaces any previously bound screen.
    pub fn set_screen(&self, screen: Rc<dyn SemiModalScreen>, host: &mut dyn HostContext) {
        let view = screen.view();
        if !host.tree().contains(view) {
            log::warn!("set_screen ignored: {view:?} is not in the view tree");
            return;
        }
        let Some(this) = self.this.upgrade() else {
            return;
        };

        host.configure_modal(view, ModalPresentationStyle::Custom, Some(this.clone()));
        *self.screen.borrow_mut() = Some(Rc::downgrade(&screen));
        self.controller.bind(&screen);

        let (overlay, indicator) = self.decorations(&this, host.tree_mut());
        self.controller
            .attach(host.tree_mut(), &[view, indicator.view(), overlay.view()]);
        log::debug!("semimodal screen bound to {view:?}");
    }

    /// Presents the bound screen over `presenting`.
    pub fn present_over(&self, presenting: ViewId, host: &mut dyn HostContext) {
        match self.screen() {
            Some(screen) => host.present(presenting, screen.view(), true),
            None => log::warn!("present ignored: no screen bound"),
        }
    }

    pub fn dismiss(&self, host: &mut dyn HostContext) {
        match self.screen() {
            Some(screen) => host.dismiss(screen.view(), true),
            None => log::debug!("dismiss ignored: no screen bound"),
        }
    }

    fn decorations(
        &self,
        this: &Rc<Self>,
        tree: &mut ViewTree,
    ) -> (Rc<OverlayView>, Rc<IndicatorView>) {
        let overlay = self
            .overlay
            .get_or_init(|| {
                let overlay = Rc::new(OverlayView::new(tree, &self.config));
                if let Err(e) = tree.add_recognizer(overlay.view(), Recognizer::tap(this.clone())) {
                    log::warn!("overlay tap not attached: {e}");
                }
                overlay
            })
            .clone();
        let indicator = self
            .indicator
            .get_or_init(|| {
                let indicator = Rc::new(IndicatorView::new(tree, &self.config));
                if let Err(e) = tree.add_recognizer(indicator.view(), Recognizer::tap(this.clone())) {
                    log::warn!("indicator tap not attached: {e}");
                }
                indicator
            })
            .clone();
        (overlay, indicator)
    }
}

impl GestureTarget for SemiModalPresenter {
    fn on_tap(&self, _view: ViewId, host: &mut dyn HostContext) {
        self.dismiss(host);
    }
}

impl TransitioningDelegate for SemiModalPresenter {
    fn presentation_controller_for(
        &self,
        presented: ViewId,
        _presenting: Option<ViewId>,
        _source: ViewId,
    ) -> Option<Box<dyn PresentationController>> {
        let (Some(overlay), Some(indicator)) = (self.overlay.get(), self.indicator.get()) else {
            log::warn!("no decorations yet; falling back to the host presentation");
            return None;
        };
        let screen = self
            .screen
            .borrow()
            .clone()
            .filter(|w| w.upgrade().is_some_and(|s| s.view() == presented));
        Some(Box::new(PresentationLayoutController::new(
            presented,
            screen,
            overlay.clone(),
            indicator.clone(),
            &self.config,
        )))
    }

    fn animation_controller_for_dismissed(
        &self,
        _dismissed: ViewId,
    ) -> Option<Rc<dyn AnimatedTransitioning>> {
        Some(Rc::new(DismissAnimator::new(self.config.dismiss_duration())))
    }

    fn interaction_controller_for_dismissal(
        &self,
        _animator: &dyn AnimatedTransitioning,
    ) -> Option<Rc<dyn InteractiveTransitioning>> {
        if !self.controller.is_interactive_dismissal() {
            return None;
        }
        Some(self.controller.clone())
    }
}
