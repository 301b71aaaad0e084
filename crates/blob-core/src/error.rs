use thiserror::Error;

/// Failures of the microphone capture and analysis path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("microphone permission denied")]
    PermissionDenied,
    #[error("microphone unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("frequency analysis requested without an active capture session")]
    TransformUnready,
}

impl CaptureError {
    /// Short message suitable for the transient on-screen notice.
    pub fn user_message(&self) -> &'static str {
        match self {
            CaptureError::PermissionDenied => {
                "Could not enable microphone. Please check browser permissions."
            }
            CaptureError::DeviceUnavailable(_) => {
                "No microphone was found. Please connect one and try again."
            }
            CaptureError::TransformUnready => "The microphone is not ready yet. Please try again.",
        }
    }

    /// Classify a rejected `getUserMedia` call by its DOMException name.
    pub fn from_dom_rejection(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "SecurityError" | "PermissionDeniedError" => {
                CaptureError::PermissionDenied
            }
            _ if message.is_empty() => CaptureError::DeviceUnavailable(name.to_string()),
            _ => CaptureError::DeviceUnavailable(format!("{}: {}", name, message)),
        }
    }
}
