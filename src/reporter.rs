//! Outbound status reports.
//!
//! Each report is one immediate send through the control channel; no
//! batching, no coalescing. With no target configured every call is a
//! no-op, never an error. The target is set once during `init` and
//! cleared once during `close`, behind a lock-free swap, so reports may
//! be issued from any thread that holds the data — peak levels from the
//! audio thread, metadata from the control thread.

use crate::transport::OscTransport;
use arc_swap::ArcSwapOption;
use rosc::{OscMessage, OscType};
use std::sync::Arc;

/// Outbound target address and reply-path prefix for status reports.
pub struct ControlChannel<T> {
    reply_path: String,
    target: ArcSwapOption<T>,
}

impl<T> ControlChannel<T> {
    pub fn new(reply_path: impl Into<String>, target: Option<T>) -> Self {
        Self {
            reply_path: reply_path.into(),
            target: ArcSwapOption::from(target.map(Arc::new)),
        }
    }

    /// Path prefix every report address is built from.
    pub fn reply_path(&self) -> &str {
        &self.reply_path
    }

    /// Whether reports will actually be sent.
    pub fn has_target(&self) -> bool {
        self.target.load().is_some()
    }

    /// Drop the target; every subsequent report becomes a no-op.
    pub(crate) fn clear_target(&self) {
        self.target.store(None);
    }
}

/// Static plugin description for `/bridge_plugin_info`.
#[derive(Debug, Clone, Default)]
pub struct PluginInfo {
    pub category: i32,
    pub hints: i32,
    pub name: String,
    pub label: String,
    pub maker: String,
    pub copyright: String,
    pub unique_id: i32,
}

/// Per-parameter descriptor for `/bridge_param_data`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParamData {
    pub index: i32,
    pub kind: i32,
    pub rindex: i32,
    pub hints: i32,
    pub midi_channel: i32,
    pub midi_cc: i32,
}

/// Value range for `/bridge_param_ranges`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParamRanges {
    pub index: i32,
    pub default: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub step_small: f32,
    pub step_large: f32,
}

/// Formats and sends the fixed catalogue of `/bridge_*` reports.
///
/// Cheap to clone (two `Arc`s); hand one to the audio thread for peak
/// reporting and keep another on the control side.
pub struct StatusReporter<T: OscTransport> {
    transport: Arc<T>,
    channel: Arc<ControlChannel<T::Target>>,
}

impl<T: OscTransport> std::fmt::Debug for StatusReporter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReporter").finish_non_exhaustive()
    }
}

impl<T: OscTransport> Clone for StatusReporter<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            channel: Arc::clone(&self.channel),
        }
    }
}

impl<T: OscTransport> StatusReporter<T> {
    pub fn new(transport: Arc<T>, channel: Arc<ControlChannel<T::Target>>) -> Self {
        Self { transport, channel }
    }

    /// The channel this reporter writes through.
    pub fn channel(&self) -> &ControlChannel<T::Target> {
        &self.channel
    }

    fn send(&self, suffix: &str, args: Vec<OscType>) {
        let guard = self.channel.target.load();
        let Some(target) = guard.as_ref() else {
            return;
        };

        let msg = OscMessage {
            addr: format!("{}{}", self.channel.reply_path, suffix),
            args,
        };
        if let Err(e) = self.transport.send(target, msg) {
            tracing::warn!("failed to send {} report: {}", suffix, e);
        }
    }

    pub fn ains_peak(&self, index: i32, value: f32) {
        self.send(
            "/bridge_ains_peak",
            vec![OscType::Int(index), OscType::Float(value)],
        );
    }

    pub fn aouts_peak(&self, index: i32, value: f32) {
        self.send(
            "/bridge_aouts_peak",
            vec![OscType::Int(index), OscType::Float(value)],
        );
    }

    pub fn audio_count(&self, ins: i32, outs: i32, total: i32) {
        self.send(
            "/bridge_audio_count",
            vec![OscType::Int(ins), OscType::Int(outs), OscType::Int(total)],
        );
    }

    pub fn midi_count(&self, ins: i32, outs: i32, total: i32) {
        self.send(
            "/bridge_midi_count",
            vec![OscType::Int(ins), OscType::Int(outs), OscType::Int(total)],
        );
    }

    pub fn param_count(&self, ins: i32, outs: i32, total: i32) {
        self.send(
            "/bridge_param_count",
            vec![OscType::Int(ins), OscType::Int(outs), OscType::Int(total)],
        );
    }

    pub fn program_count(&self, count: i32) {
        self.send("/bridge_program_count", vec![OscType::Int(count)]);
    }

    pub fn midi_program_count(&self, count: i32) {
        self.send("/bridge_midi_program_count", vec![OscType::Int(count)]);
    }

    pub fn plugin_info(&self, info: &PluginInfo) {
        self.send(
            "/bridge_plugin_info",
            vec![
                OscType::Int(info.category),
                OscType::Int(info.hints),
                OscType::String(info.name.clone()),
                OscType::String(info.label.clone()),
                OscType::String(info.maker.clone()),
                OscType::String(info.copyright.clone()),
                OscType::Int(info.unique_id),
            ],
        );
    }

    pub fn param_info(&self, index: i32, name: &str, unit: &str) {
        self.send(
            "/bridge_param_info",
            vec![
                OscType::Int(index),
                OscType::String(name.to_string()),
                OscType::String(unit.to_string()),
            ],
        );
    }

    pub fn param_data(&self, data: &ParamData) {
        self.send(
            "/bridge_param_data",
            vec![
                OscType::Int(data.index),
                OscType::Int(data.kind),
                OscType::Int(data.rindex),
                OscType::Int(data.hints),
                OscType::Int(data.midi_channel),
                OscType::Int(data.midi_cc),
            ],
        );
    }

    pub fn param_ranges(&self, ranges: &ParamRanges) {
        self.send(
            "/bridge_param_ranges",
            vec![
                OscType::Int(ranges.index),
                OscType::Float(ranges.default),
                OscType::Float(ranges.min),
                OscType::Float(ranges.max),
                OscType::Float(ranges.step),
                OscType::Float(ranges.step_small),
                OscType::Float(ranges.step_large),
            ],
        );
    }

    pub fn program_info(&self, index: i32, name: &str) {
        self.send(
            "/bridge_program_info",
            vec![OscType::Int(index), OscType::String(name.to_string())],
        );
    }

    pub fn midi_program_info(&self, index: i32, bank: i32, program: i32, label: &str) {
        self.send(
            "/bridge_midi_program_info",
            vec![
                OscType::Int(index),
                OscType::Int(bank),
                OscType::Int(program),
                OscType::String(label.to_string()),
            ],
        );
    }

    pub fn custom_data(&self, kind: &str, key: &str, value: &str) {
        self.send(
            "/bridge_custom_data",
            vec![
                OscType::String(kind.to_string()),
                OscType::String(key.to_string()),
                OscType::String(value.to_string()),
            ],
        );
    }

    pub fn chunk_data(&self, data: &str) {
        self.send(
            "/bridge_chunk_data",
            vec![OscType::String(data.to_string())],
        );
    }

    /// Generic "state changed" ping.
    pub fn update(&self) {
        self.send("/bridge_update", vec![]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::transport::MessageHandler;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OscMessage>>,
    }

    impl OscTransport for RecordingTransport {
        type Target = ();

        fn resolve(&self, _host: &str, _port: u16) -> Result<()> {
            Ok(())
        }

        fn send(&self, _target: &(), msg: OscMessage) -> Result<()> {
            self.sent.lock().push(msg);
            Ok(())
        }

        fn start(&self, _handler: MessageHandler) -> Result<String> {
            Ok("osc.udp://127.0.0.1:0/".to_string())
        }

        fn stop(&self) {}
    }

    fn reporter(target: Option<()>) -> (Arc<RecordingTransport>, StatusReporter<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let channel = Arc::new(ControlChannel::new("/Carla", target));
        let reporter = StatusReporter::new(Arc::clone(&transport), channel);
        (transport, reporter)
    }

    #[test]
    fn test_peak_report_shape() {
        let (transport, reporter) = reporter(Some(()));
        reporter.ains_peak(1, 0.5);

        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].addr, "/Carla/bridge_ains_peak");
        assert_eq!(sent[0].args, vec![OscType::Int(1), OscType::Float(0.5)]);
    }

    #[test]
    fn test_count_and_info_reports() {
        let (transport, reporter) = reporter(Some(()));
        reporter.audio_count(2, 2, 4);
        reporter.program_count(10);
        reporter.param_info(0, "Gain", "dB");
        reporter.update();

        let sent = transport.sent.lock();
        let addrs: Vec<&str> = sent.iter().map(|m| m.addr.as_str()).collect();
        assert_eq!(
            addrs,
            vec![
                "/Carla/bridge_audio_count",
                "/Carla/bridge_program_count",
                "/Carla/bridge_param_info",
                "/Carla/bridge_update",
            ]
        );
        assert_eq!(
            sent[0].args,
            vec![OscType::Int(2), OscType::Int(2), OscType::Int(4)]
        );
        assert_eq!(
            sent[2].args,
            vec![
                OscType::Int(0),
                OscType::String("Gain".to_string()),
                OscType::String("dB".to_string()),
            ]
        );
        assert!(sent[3].args.is_empty());
    }

    #[test]
    fn test_plugin_info_shape() {
        let (transport, reporter) = reporter(Some(()));
        reporter.plugin_info(&PluginInfo {
            category: 2,
            hints: 0x11,
            name: "SuperSynth".to_string(),
            label: "supersynth".to_string(),
            maker: "ACME".to_string(),
            copyright: "GPL".to_string(),
            unique_id: 1234,
        });

        let sent = transport.sent.lock();
        assert_eq!(sent[0].addr, "/Carla/bridge_plugin_info");
        assert_eq!(sent[0].args.len(), 7);
        assert_eq!(sent[0].args[2], OscType::String("SuperSynth".to_string()));
        assert_eq!(sent[0].args[6], OscType::Int(1234));
    }

    #[test]
    fn test_param_ranges_shape() {
        let (transport, reporter) = reporter(Some(()));
        reporter.param_ranges(&ParamRanges {
            index: 3,
            default: 0.5,
            min: 0.0,
            max: 1.0,
            step: 0.01,
            step_small: 0.001,
            step_large: 0.1,
        });

        let sent = transport.sent.lock();
        assert_eq!(sent[0].addr, "/Carla/bridge_param_ranges");
        assert_eq!(sent[0].args[0], OscType::Int(3));
        assert_eq!(sent[0].args[3], OscType::Float(1.0));
        assert_eq!(sent[0].args.len(), 7);
    }

    #[test]
    fn test_no_target_is_noop() {
        let (transport, reporter) = reporter(None);
        reporter.ains_peak(0, 1.0);
        reporter.plugin_info(&PluginInfo::default());
        reporter.chunk_data("data");
        reporter.update();

        assert!(transport.sent.lock().is_empty());
        assert!(!reporter.channel().has_target());
    }

    #[test]
    fn test_cleared_target_is_noop() {
        let (transport, reporter) = reporter(Some(()));
        reporter.update();
        reporter.channel().clear_target();
        reporter.update();

        assert_eq!(transport.sent.lock().len(), 1);
    }
}
