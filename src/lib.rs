pub mod devices;
pub mod hostinfo;
pub mod mac;
pub mod neighbors;
pub mod radio;
pub mod registry;
pub mod scanner;
pub mod speedtest;
pub mod web;
