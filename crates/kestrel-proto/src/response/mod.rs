//! Numeric reply codes and the reply formatter.
//!
//! Only the numerics this server emits are listed.

#![allow(non_camel_case_types)]

mod helpers;
mod reply;

pub use helpers::ParseResponseError;
pub use reply::Numeric;

/// IRC numeric reply code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Response {
    // === Registration (001-099) ===
    /// 001
    RPL_WELCOME = 1,
    /// 002
    RPL_YOURHOST = 2,
    /// 003
    RPL_CREATED = 3,
    /// 004
    RPL_MYINFO = 4,
    /// 005
    RPL_ISUPPORT = 5,

    // === Command replies (200-399) ===
    /// 221 - current user modes
    RPL_UMODEIS = 221,
    /// 302
    RPL_USERHOST = 302,
    /// 311
    RPL_WHOISUSER = 311,
    /// 312
    RPL_WHOISSERVER = 312,
    /// 313
    RPL_WHOISOPERATOR = 313,
    /// 317
    RPL_WHOISIDLE = 317,
    /// 318
    RPL_ENDOFWHOIS = 318,
    /// 319
    RPL_WHOISCHANNELS = 319,
    /// 324
    RPL_CHANNELMODEIS = 324,
    /// 331
    RPL_NOTOPIC = 331,
    /// 332
    RPL_TOPIC = 332,
    /// 341
    RPL_INVITING = 341,
    /// 346 - invite-exception list entry
    RPL_INVITELIST = 346,
    /// 347
    RPL_ENDOFINVITELIST = 347,
    /// 348 - ban-exception list entry
    RPL_EXCEPTLIST = 348,
    /// 349
    RPL_ENDOFEXCEPTLIST = 349,
    /// 353
    RPL_NAMREPLY = 353,
    /// 366
    RPL_ENDOFNAMES = 366,
    /// 367
    RPL_BANLIST = 367,
    /// 368
    RPL_ENDOFBANLIST = 368,
    /// 372
    RPL_MOTD = 372,
    /// 375
    RPL_MOTDSTART = 375,
    /// 376
    RPL_ENDOFMOTD = 376,

    // === Errors (400-599) ===
    /// 401
    ERR_NOSUCHNICK = 401,
    /// 403
    ERR_NOSUCHCHANNEL = 403,
    /// 404
    ERR_CANNOTSENDTOCHAN = 404,
    /// 421
    ERR_UNKNOWNCOMMAND = 421,
    /// 422
    ERR_NOMOTD = 422,
    /// 431
    ERR_NONICKNAMEGIVEN = 431,
    /// 432
    ERR_ERRONEOUSNICKNAME = 432,
    /// 433
    ERR_NICKNAMEINUSE = 433,
    /// 441
    ERR_USERNOTINCHANNEL = 441,
    /// 442
    ERR_NOTONCHANNEL = 442,
    /// 443
    ERR_USERONCHANNEL = 443,
    /// 451
    ERR_NOTREGISTERED = 451,
    /// 461
    ERR_NEEDMOREPARAMS = 461,
    /// 462
    ERR_ALREADYREGISTERED = 462,
    /// 471
    ERR_CHANNELISFULL = 471,
    /// 472
    ERR_UNKNOWNMODE = 472,
    /// 473
    ERR_INVITEONLYCHAN = 473,
    /// 474
    ERR_BANNEDFROMCHAN = 474,
    /// 475
    ERR_BADCHANNELKEY = 475,
    /// 482
    ERR_CHANOPRIVSNEEDED = 482,
    /// 502
    ERR_USERSDONTMATCH = 502,
}
