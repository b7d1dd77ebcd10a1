use std::sync::{Arc, Mutex};

use tauri_plugin_share_plus::{
    CompletionHandle, Dispatcher, Error, EventSink, InboundRequest, PresentationSurface,
    RequestId, ShareContent, ShareResult,
};

struct HeldSurface {
    label: &'static str,
    handles: Mutex<Vec<CompletionHandle>>,
}

impl HeldSurface {
    fn new(label: &'static str) -> Arc<Self> {
        Arc::new(Self {
            label,
            handles: Mutex::new(Vec::new()),
        })
    }

    fn take(&self, id: RequestId) -> CompletionHandle {
        let mut handles = self.handles.lock().unwrap();
        let index = handles
            .iter()
            .position(|handle| handle.id() == id)
            .expect("no pending share with that id");
        handles.remove(index)
    }
}

impl PresentationSurface for HeldSurface {
    fn label(&self) -> &str {
        self.label
    }

    fn launch(
        &self,
        _content: ShareContent,
        completion: CompletionHandle,
    ) -> tauri_plugin_share_plus::Result<()> {
        self.handles.lock().unwrap().push(completion);
        Ok(())
    }
}

#[derive(Default)]
struct Events(Mutex<Vec<(String, ShareResult)>>);

impl EventSink for Events {
    fn emit(&self, event: &str, payload: &ShareResult) -> tauri_plugin_share_plus::Result<()> {
        self.0
            .lock()
            .unwrap()
            .push((event.to_string(), payload.clone()));
        Ok(())
    }
}

impl Events {
    fn snapshot(&self) -> Vec<(String, ShareResult)> {
        self.0.lock().unwrap().clone()
    }
}

fn setup() -> (Arc<Dispatcher>, Arc<Events>) {
    let dispatcher = Dispatcher::new(5001);
    let events = Arc::new(Events::default());
    dispatcher.notifier().attach(events.clone());
    (dispatcher, events)
}

#[test]
fn share_round_trip_reports_through_share_callback() {
    let (dispatcher, events) = setup();
    let surface = HeldSurface::new("main");
    dispatcher.initiator().attach(surface.clone());

    let id = dispatcher
        .handle_share("hi".to_string(), Some("subj".to_string()))
        .unwrap();
    assert_eq!(id, RequestId::new(5002));
    assert!(surface.take(id).complete(true));

    assert_eq!(
        events.snapshot(),
        vec![(
            "shareCallback".to_string(),
            ShareResult {
                request_code: "5002".to_string(),
                result: true,
            }
        )]
    );
}

#[test]
fn result_survives_a_rotation_between_issue_and_completion() {
    let (dispatcher, events) = setup();
    let before = HeldSurface::new("main");
    dispatcher.initiator().attach(before.clone());
    let id = dispatcher.handle_share("hi".to_string(), None).unwrap();

    dispatcher.initiator().detach();
    let after = HeldSurface::new("main");
    dispatcher.initiator().attach(after.clone());
    let next = dispatcher.handle_share("again".to_string(), None).unwrap();

    assert!(before.take(id).complete(false));
    assert!(after.take(next).complete(true));

    let results: Vec<_> = events.snapshot().into_iter().map(|(_, r)| r).collect();
    assert_eq!(
        results,
        vec![ShareResult::new(id, false), ShareResult::new(next, true)]
    );
}

#[test]
fn interleaved_requests_resolve_independently() {
    let (dispatcher, events) = setup();
    let surface = HeldSurface::new("main");
    dispatcher.initiator().attach(surface.clone());

    let first = dispatcher.handle_share("one".to_string(), None).unwrap();
    let second = dispatcher.handle_share("two".to_string(), None).unwrap();
    let second_handle = surface.take(second);
    let first_handle = surface.take(first);

    assert!(second_handle.complete(true));
    assert!(!dispatcher.on_completion(second, true));
    assert!(first_handle.complete(false));

    let codes: Vec<_> = events
        .snapshot()
        .into_iter()
        .map(|(_, r)| r.request_code)
        .collect();
    assert_eq!(codes, vec![second.to_string(), first.to_string()]);
}

#[test]
fn method_router_feeds_the_dispatcher() {
    let (dispatcher, events) = setup();
    dispatcher.initiator().attach(HeldSurface::new("main"));
    let file = tempfile::NamedTempFile::new().unwrap();

    let request = InboundRequest::from_method(
        "shareFiles",
        serde_json::json!({
            "paths": [file.path().to_string_lossy()],
            "mimeTypes": ["text/plain"],
        }),
    )
    .unwrap();
    let id = dispatcher.dispatch(request).unwrap();

    assert!(dispatcher.on_completion(id, true));
    assert_eq!(events.snapshot()[0].0, "shareFilesCallback");
}

#[test]
fn missing_surface_and_bad_files_fail_synchronously() {
    let (dispatcher, events) = setup();

    let err = dispatcher.handle_share("hi".to_string(), None).unwrap_err();
    assert!(matches!(err, Error::NoSurfaceAttached));

    dispatcher.initiator().attach(HeldSurface::new("main"));
    let err = dispatcher
        .handle_share_files(&["/missing/photo.jpg".to_string()], None, None, None)
        .unwrap_err();
    assert!(matches!(err, Error::FileAccess { .. }));

    assert!(dispatcher.registry().is_empty());
    let id = dispatcher.handle_share("hi".to_string(), None).unwrap();
    assert_eq!(id, RequestId::new(5002));
    assert!(events.snapshot().is_empty());
}
