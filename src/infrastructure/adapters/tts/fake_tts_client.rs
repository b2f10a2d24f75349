//! Fake TTS Client - 测试与离线运行用的 TTS 客户端
//!
//! 返回固定的音色列表与音频字节，不发起任何网络调用；记录每个
//! 端口方法的调用次数，供"长度超限不触发供应商调用"一类的断言
//! 使用。失败开关用于演练供应商故障路径。

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::application::ports::{ProviderError, SynthesisRequest, TtsProviderPort};
use crate::domain::voice::Voice;

/// Fake TTS Client
pub struct FakeTtsClient {
    voices: Mutex<Vec<Voice>>,
    audio: Bytes,
    fail_voices: AtomicBool,
    fail_synthesize: AtomicBool,
    voices_calls: AtomicUsize,
    synthesize_calls: AtomicUsize,
}

impl FakeTtsClient {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self {
            voices: Mutex::new(voices),
            audio: Bytes::from_static(b"fake-audio"),
            fail_voices: AtomicBool::new(false),
            fail_synthesize: AtomicBool::new(false),
            voices_calls: AtomicUsize::new(0),
            synthesize_calls: AtomicUsize::new(0),
        }
    }

    /// 覆盖合成返回的音频字节
    pub fn with_audio(mut self, audio: impl Into<Bytes>) -> Self {
        self.audio = audio.into();
        self
    }

    /// 替换下次 fetch_voices 返回的列表
    pub fn set_voices(&self, voices: Vec<Voice>) {
        *self.voices.lock().expect("fake voices lock poisoned") = voices;
    }

    pub fn set_fail_voices(&self, fail: bool) {
        self.fail_voices.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_synthesize(&self, fail: bool) {
        self.fail_synthesize.store(fail, Ordering::SeqCst);
    }

    /// fetch_voices 被调用的次数
    pub fn voices_calls(&self) -> usize {
        self.voices_calls.load(Ordering::SeqCst)
    }

    /// synthesize 被调用的次数
    pub fn synthesize_calls(&self) -> usize {
        self.synthesize_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TtsProviderPort for FakeTtsClient {
    async fn fetch_voices(&self) -> Result<Vec<Voice>, ProviderError> {
        self.voices_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_voices.load(Ordering::SeqCst) {
            return Err(ProviderError::Network("fake voice list failure".to_string()));
        }
        Ok(self.voices.lock().expect("fake voices lock poisoned").clone())
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<Bytes, ProviderError> {
        self.synthesize_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_synthesize.load(Ordering::SeqCst) {
            return Err(ProviderError::Service {
                status: 500,
                message: "fake synthesis failure".to_string(),
            });
        }

        tracing::debug!(
            voice_id = %request.voice_id,
            text_len = request.text.len(),
            "FakeTtsClient: returning fixed audio"
        );
        Ok(self.audio.clone())
    }
}
