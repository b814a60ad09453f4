//! skiff-core
//!
//! Core building blocks for retrieving a single object from an object store
//! through the store's command-line client.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（locator, command, environment, listing, config, state, errors）
//! - **ports**: 抽象化レイヤー（ProcessRunner, Picker, Viewer, Notifier）
//! - **app**: アプリケーションロジック（builder, retriever, transfer, discovery）
//! - **impls**: 実装（TokioProcessRunner と、テスト用の Scripted 実装）
//! - **observability**: tracing の target 定数

pub mod domain;
pub mod ports;
pub mod app;
pub mod impls;
pub mod observability;
