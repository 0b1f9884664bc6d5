use super::*;

struct RecordingReveal {
    targets: Vec<RevealTarget>,
    supports_observer: bool,
    observed: RefCell<Vec<usize>>,
    unobserved: RefCell<Vec<usize>>,
    classes: RefCell<Vec<(usize, String)>>,
    images: RefCell<Vec<(usize, String)>>,
    on_enter: RefCell<Option<Rc<dyn Fn(usize)>>>,
    disconnected: RefCell<bool>,
}

impl RecordingReveal {
    fn new(supports_observer: bool) -> Rc<Self> {
        Rc::new(Self {
            targets: vec![
                RevealTarget { index: 0, kind: RevealKind::Animate },
                RevealTarget { index: 1, kind: RevealKind::LazyImage { src: "/img/project.webp".to_owned() } },
                RevealTarget { index: 2, kind: RevealKind::Animate },
            ],
            supports_observer,
            observed: RefCell::new(Vec::new()),
            unobserved: RefCell::new(Vec::new()),
            classes: RefCell::new(Vec::new()),
            images: RefCell::new(Vec::new()),
            on_enter: RefCell::new(None),
            disconnected: RefCell::new(false),
        })
    }

    fn enter(&self, index: usize) {
        let on_enter = self.on_enter.borrow().clone().unwrap();
        on_enter(index);
    }
}

impl RevealSurface for RecordingReveal {
    fn targets(&self) -> Vec<RevealTarget> {
        self.targets.clone()
    }

    fn observe(&self, indices: &[usize], on_enter: Rc<dyn Fn(usize)>) -> bool {
        if !self.supports_observer {
            return false;
        }
        self.observed.borrow_mut().extend_from_slice(indices);
        *self.on_enter.borrow_mut() = Some(on_enter);
        true
    }

    fn unobserve(&self, index: usize) {
        self.unobserved.borrow_mut().push(index);
    }

    fn add_class(&self, index: usize, class: &str) {
        self.classes.borrow_mut().push((index, class.to_owned()));
    }

    fn load_image(&self, index: usize, src: &str) {
        self.images.borrow_mut().push((index, src.to_owned()));
    }

    fn disconnect(&self) {
        *self.disconnected.borrow_mut() = true;
    }
}

#[test]
fn observes_all_targets_without_revealing() {
    let surface = RecordingReveal::new(true);
    let tracker = RevealTracker::new(surface.clone());
    tracker.initialize();
    assert_eq!(*surface.observed.borrow(), vec![0, 1, 2]);
    assert_eq!(tracker.revealed_count(), 0);
    assert!(surface.classes.borrow().is_empty());
}

#[test]
fn entering_view_animates_once_and_unobserves() {
    let surface = RecordingReveal::new(true);
    let tracker = RevealTracker::new(surface.clone());
    tracker.initialize();

    surface.enter(0);
    surface.enter(0);
    assert_eq!(*surface.classes.borrow(), vec![(0, ANIMATE_IN_CLASS.to_owned())]);
    assert_eq!(*surface.unobserved.borrow(), vec![0]);
    assert_eq!(tracker.revealed_count(), 1);
}

#[test]
fn lazy_image_promotes_source() {
    let surface = RecordingReveal::new(true);
    let tracker = RevealTracker::new(surface.clone());
    tracker.initialize();

    surface.enter(1);
    assert_eq!(*surface.images.borrow(), vec![(1, "/img/project.webp".to_owned())]);
    assert!(surface.classes.borrow().is_empty());
}

#[test]
fn unknown_index_is_ignored() {
    let surface = RecordingReveal::new(true);
    let tracker = RevealTracker::new(surface.clone());
    tracker.initialize();
    assert!(!tracker.reveal(42));
    assert!(surface.unobserved.borrow().is_empty());
}

#[test]
fn without_observer_everything_reveals_immediately() {
    let surface = RecordingReveal::new(false);
    let tracker = RevealTracker::new(surface.clone());
    tracker.initialize();
    assert_eq!(tracker.revealed_count(), 3);
    assert_eq!(surface.classes.borrow().len(), 2);
    assert_eq!(surface.images.borrow().len(), 1);
}

#[test]
fn teardown_disconnects_observer() {
    let surface = RecordingReveal::new(true);
    let tracker = RevealTracker::new(surface.clone());
    tracker.initialize();
    tracker.teardown();
    assert!(*surface.disconnected.borrow());
}
