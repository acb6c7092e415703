//! Per-channel sample accumulation

/// Collects interleaved frames into one buffer per channel
#[derive(Debug)]
pub struct ChannelBuffer {
    /// One sample vector per channel
    channels: Vec<Vec<f64>>,
}

impl ChannelBuffer {
    /// Create a buffer for `channel_count` channels
    pub fn new(channel_count: usize) -> Self {
        Self {
            channels: vec![Vec::new(); channel_count],
        }
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Append interleaved samples (`[l0, r0, l1, r1, ...]` for stereo)
    ///
    /// A trailing incomplete frame is ignored.
    pub fn push_interleaved(&mut self, samples: &[f64]) {
        let count = self.channels.len();
        if count == 0 {
            return;
        }
        for frame in samples.chunks_exact(count) {
            for (channel, &sample) in self.channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
    }

    /// Frames collected so far
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    /// Consume the buffer
    pub fn into_channels(self) -> Vec<Vec<f64>> {
        self.channels
    }
}
