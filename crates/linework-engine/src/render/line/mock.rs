//! Recording backend for GPU-free tests.

use std::cell::RefCell;
use std::rc::Rc;

use winit::dpi::PhysicalSize;

use crate::coords::Viewport;

use super::backend::{BackendError, DrawCall, LineBackend, PassDesc, PipelineDesc};
use super::binding::BufferRole;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MockEvent {
    BeginCommands,
    BeginPass,
    Write(&'static str),
    Viewport,
    Bind,
    Draw,
    EndPass,
    Submit,
    Present,
}

#[derive(Debug, Clone)]
pub(crate) struct PipelineRecord {
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub slots: Vec<BufferRole>,
    pub topology: wgpu::PrimitiveTopology,
}

#[derive(Debug, Default)]
pub(crate) struct MockLog {
    pub events: Vec<MockEvent>,
    pub writes: Vec<(&'static str, Vec<u8>)>,
    pub bindings: Vec<Vec<(u32, &'static str)>>,
    pub viewports: Vec<Viewport>,
    pub draws: Vec<DrawCall>,
    pub pipelines: Vec<PipelineRecord>,
    pub submissions: usize,
    pub presentations: usize,
    /// When set, `begin_pass` fails.
    pub fail_pass: bool,
}

impl MockLog {
    pub fn writes_to<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.writes
            .iter()
            .filter(move |(l, _)| *l == label)
            .map(|(_, bytes)| bytes.as_slice())
    }

    pub fn count(&self, event: &MockEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

pub(crate) type SharedLog = Rc<RefCell<MockLog>>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MockBuffer {
    pub label: &'static str,
}

pub(crate) struct MockDrawable {
    pub size: PhysicalSize<u32>,
}

impl MockDrawable {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: PhysicalSize::new(width, height),
        }
    }
}

pub(crate) struct MockBackend {
    log: SharedLog,
    fail_buffer: Option<&'static str>,
    fail_pipeline: bool,
}

impl MockBackend {
    pub fn new() -> (Self, SharedLog) {
        let log = SharedLog::default();
        let backend = Self {
            log: log.clone(),
            fail_buffer: None,
            fail_pipeline: false,
        };
        (backend, log)
    }

    pub fn failing_buffer(mut self, label: &'static str) -> Self {
        self.fail_buffer = Some(label);
        self
    }

    pub fn failing_pipeline(mut self) -> Self {
        self.fail_pipeline = true;
        self
    }

    fn record(&self, event: MockEvent) {
        self.log.borrow_mut().events.push(event);
    }
}

fn static_label(label: &str) -> &'static str {
    [BufferRole::Payload, BufferRole::Angle]
        .into_iter()
        .map(BufferRole::label)
        .find(|l| *l == label)
        .unwrap_or("other")
}

impl LineBackend for MockBackend {
    type Buffer = MockBuffer;
    type Pipeline = ();
    type Encoder = ();
    type Pass = ();
    type Drawable = MockDrawable;

    fn create_buffer(&mut self, label: &str, _size: u64) -> Result<MockBuffer, BackendError> {
        if self.fail_buffer == Some(label) {
            return Err(BackendError::new("out of memory"));
        }
        Ok(MockBuffer {
            label: static_label(label),
        })
    }

    fn create_pipeline(&mut self, desc: &PipelineDesc<'_>) -> Result<(), BackendError> {
        if self.fail_pipeline {
            return Err(BackendError::new("pipeline rejected"));
        }
        self.log.borrow_mut().pipelines.push(PipelineRecord {
            vertex_entry: desc.shaders.vertex_entry.to_string(),
            fragment_entry: desc.shaders.fragment_entry.to_string(),
            slots: desc.slots.to_vec(),
            topology: desc.topology,
        });
        Ok(())
    }

    fn drawable_size(&self, drawable: &MockDrawable) -> PhysicalSize<u32> {
        drawable.size
    }

    fn write_buffer(&mut self, buffer: &MockBuffer, bytes: &[u8]) {
        let mut log = self.log.borrow_mut();
        log.events.push(MockEvent::Write(buffer.label));
        log.writes.push((buffer.label, bytes.to_vec()));
    }

    fn begin_commands(&mut self) {
        self.record(MockEvent::BeginCommands);
    }

    fn begin_pass(
        &mut self,
        _encoder: &mut (),
        _drawable: &MockDrawable,
        _pass: &PassDesc,
    ) -> Result<(), BackendError> {
        if self.log.borrow().fail_pass {
            return Err(BackendError::new("encoder unavailable"));
        }
        self.record(MockEvent::BeginPass);
        Ok(())
    }

    fn set_viewport(&mut self, _pass: &mut (), viewport: Viewport) {
        let mut log = self.log.borrow_mut();
        log.events.push(MockEvent::Viewport);
        log.viewports.push(viewport);
    }

    fn bind(&mut self, _pass: &mut (), _pipeline: &(), buffers: &[(u32, &MockBuffer)]) {
        let mut log = self.log.borrow_mut();
        log.events.push(MockEvent::Bind);
        log.bindings
            .push(buffers.iter().map(|(slot, b)| (*slot, b.label)).collect());
    }

    fn draw(&mut self, _pass: &mut (), call: &DrawCall) {
        let mut log = self.log.borrow_mut();
        log.events.push(MockEvent::Draw);
        log.draws.push(call.clone());
    }

    fn end_pass(&mut self, _pass: ()) {
        self.record(MockEvent::EndPass);
    }

    fn submit_and_present(&mut self, _encoder: (), _drawable: MockDrawable) {
        let mut log = self.log.borrow_mut();
        log.events.push(MockEvent::Submit);
        log.submissions += 1;
        log.events.push(MockEvent::Present);
        log.presentations += 1;
    }
}
