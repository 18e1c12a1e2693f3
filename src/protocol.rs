use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join (or rejoin with `token`) the chat
    Join {
        token: Option<String>,
        display_name: Option<String>,
    },
    /// Post a chat line; lines in the trivia channel count as guesses
    Chat {
        token: String,
        channel_id: ChannelId,
        text: String,
    },
    // Host-only messages
    HostStartGame,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        role: Role,
        text_channel_id: ChannelId,
        voice_channel_id: ChannelId,
        game_running: bool,
        server_now: String,
    },
    Joined {
        participant_id: ParticipantId,
        token: String,
        display_name: String,
    },
    /// Line posted to a text channel; `author` is None for game status
    ChannelMessage {
        channel_id: ChannelId,
        author: Option<String>,
        text: String,
        ts: String,
    },
    /// Sent back to the guesser only
    GuessResult {
        outcome: GuessOutcome,
    },
    /// Listeners in `voice_channel_id` should start playing the clip
    PlayClip {
        voice_channel_id: ChannelId,
        clip_id: ClipId,
        url: String,
    },
    StopClip {
        voice_channel_id: ChannelId,
        clip_id: ClipId,
    },
    VoiceDisconnected {
        voice_channel_id: ChannelId,
    },
    GameStarted {
        game_id: GameId,
    },
    GameFinished {
        game_id: GameId,
        standings: Vec<Standing>,
    },
    Error {
        code: String,
        msg: String,
    },
}
