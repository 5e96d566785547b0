//! Registration, login and the OTP password-reset flow.

pub mod service;

pub use service::{
    AuthService, CheckOtpRequest, ForgotPasswordRequest, LoginRequest, LoginResponse,
    RegisterRequest, RegisterResponse, ResetPasswordRequest,
};
