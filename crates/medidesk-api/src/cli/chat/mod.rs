//! Interactive chat with the clinic assistant.
//!
//! Entry point: `loop_runner::run_chat_loop`. Each submitted line becomes its
//! own in-flight request; replies print as they arrive, labelled with the
//! submission they answer.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
