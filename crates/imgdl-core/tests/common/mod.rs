#![allow(dead_code)]

pub mod image_server;
pub mod images;
