// Messaging - lock-free channels between the front end, the piano and the audio stream

pub mod channels;
pub mod command;

pub use channels::{
    AudioCommandConsumer, AudioCommandProducer, CommandConsumer, CommandProducer,
    create_audio_channel, create_command_channel,
};
pub use command::{AudioCommand, Command};
